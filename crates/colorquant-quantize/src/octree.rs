//! Octree color quantization
//!
//! Builds a color description tree over the RGB cube, one level per bit of
//! resolution, then repeatedly removes sparsely populated nodes until no
//! more than the requested number of nodes represent pixels directly. Each
//! remaining such node contributes the mean of its pixels to the palette.
//!
//! Nodes live in an arena and refer to each other by index. Removed slots
//! are recycled through a free list.

use crate::quantizer::{ColorQuantizer, check_max_colors, nearest_color_index};
use crate::{ColorError, ColorResult};
use colorquant_core::{IndexedImage, Palette, RgbImage, color};

/// Hard limit on live tree nodes while pixels are inserted (2^18 - 1)
pub const MAX_NODES: usize = 262_143;

/// Maximum tree depth (one level per bit of an 8-bit channel)
pub const MAX_TREE_DEPTH: u32 = 8;

const ROOT: usize = 0;

/// Options for octree quantization
#[derive(Debug, Clone)]
pub struct OctreeOptions {
    /// Maximum number of colors in the output palette (1..=256)
    pub max_colors: u32,
    /// Classify colors by descending the reduced tree instead of searching
    /// the palette exhaustively
    pub quick_quantization: bool,
}

impl Default for OctreeOptions {
    fn default() -> Self {
        Self {
            max_colors: 256,
            quick_quantization: false,
        }
    }
}

impl OctreeOptions {
    /// Check that the options describe a valid run
    pub fn validate(&self) -> ColorResult<()> {
        check_max_colors(self.max_colors)
    }
}

/// Starting depth for a target palette size: `floor(log2(k)) - 1`,
/// clamped to `2..=8`.
fn initial_depth(max_colors: u32) -> u32 {
    let log2 = 31 - max_colors.max(1).leading_zeros() as i32;
    (log2 - 1).clamp(2, MAX_TREE_DEPTH as i32) as u32
}

#[derive(Debug, Clone)]
struct OctreeNode {
    parent: Option<usize>,
    children: [Option<usize>; 8],
    /// branch index at the parent
    id: usize,
    level: u32,
    /// pixels in this node's cube, including all descendants
    n_pixels: u64,
    /// pixels represented by this node and none of its children
    n_unique: u64,
    /// center of the node's cube
    mid: [i32; 3],
    /// channel sums of the `n_unique` pixels
    total: [u64; 3],
    color_idx: Option<usize>,
}

impl OctreeNode {
    fn root() -> Self {
        let mid = (color::MAX_RGB as i32 + 1) / 2;
        Self {
            parent: None,
            children: [None; 8],
            id: 0,
            level: 0,
            n_pixels: 0,
            n_unique: 0,
            mid: [mid; 3],
            total: [0; 3],
            color_idx: None,
        }
    }

    fn child(parent: usize, parent_node: &OctreeNode, id: usize) -> Self {
        let level = parent_node.level + 1;
        let offset = 256i32 >> (level + 1);
        let mut mid = parent_node.mid;
        for (c, m) in mid.iter_mut().enumerate() {
            if id & (1 << c) != 0 {
                *m += offset;
            } else {
                *m -= offset;
            }
        }
        Self {
            parent: Some(parent),
            children: [None; 8],
            id,
            level,
            n_pixels: 0,
            n_unique: 0,
            mid,
            total: [0; 3],
            color_idx: None,
        }
    }

    /// Child branch for a color: bit 0 red, bit 1 green, bit 2 blue, set
    /// when the component lies above the midpoint.
    fn child_id(&self, rgb: [u8; 3]) -> usize {
        (0..3)
            .filter(|&c| rgb[c] as i32 > self.mid[c])
            .fold(0, |id, c| id | (1 << c))
    }
}

/// Running state of one sparse-node reduction pass
#[derive(Debug)]
struct ReduceContext {
    threshold: u64,
    color_count: usize,
    new_min: u64,
}

/// Color description tree
#[derive(Debug, Clone)]
struct Octree {
    nodes: Vec<OctreeNode>,
    free: Vec<usize>,
    node_count: usize,
    depth: u32,
    max_nodes: usize,
}

impl Octree {
    fn new(depth: u32, max_nodes: usize) -> Self {
        Self {
            nodes: vec![OctreeNode::root()],
            free: Vec::new(),
            node_count: 1,
            depth,
            max_nodes,
        }
    }

    fn add_pixels(&mut self, pixels: &[u32]) {
        for &p in pixels {
            self.add_pixel(p);
            if self.node_count > self.max_nodes && self.depth > 1 {
                self.prune_deepest();
            }
        }
    }

    fn add_pixel(&mut self, pixel: u32) {
        let rgb = color::to_triple(pixel);
        let mut node = ROOT;
        self.nodes[ROOT].n_pixels += 1;
        for _ in 0..self.depth {
            let id = self.nodes[node].child_id(rgb);
            node = match self.nodes[node].children[id] {
                Some(child) => child,
                None => self.add_child(node, id),
            };
            self.nodes[node].n_pixels += 1;
        }

        let leaf = &mut self.nodes[node];
        leaf.n_unique += 1;
        for (t, &v) in leaf.total.iter_mut().zip(rgb.iter()) {
            *t += v as u64;
        }
    }

    fn add_child(&mut self, parent: usize, id: usize) -> usize {
        let node = OctreeNode::child(parent, &self.nodes[parent], id);
        let idx = match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = node;
                slot
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        };
        self.nodes[parent].children[id] = Some(idx);
        self.node_count += 1;
        idx
    }

    /// Fold a node's pixels into its parent and unlink it.
    fn delete(&mut self, idx: usize) {
        let node = &self.nodes[idx];
        let Some(parent) = node.parent else {
            return;
        };
        let (id, n_unique, total) = (node.id, node.n_unique, node.total);

        let p = &mut self.nodes[parent];
        p.n_unique += n_unique;
        for (t, v) in p.total.iter_mut().zip(total) {
            *t += v;
        }
        p.children[id] = None;
        self.free.push(idx);
        self.node_count -= 1;
    }

    /// Remove the deepest level and make the tree one level shallower.
    fn prune_deepest(&mut self) {
        log::warn!(
            "octree node limit {} exceeded, pruning level {}",
            self.max_nodes,
            self.depth
        );
        self.prune_level(ROOT);
        self.depth -= 1;
    }

    fn prune_level(&mut self, idx: usize) {
        let children = self.nodes[idx].children;
        for child in children.into_iter().flatten() {
            self.prune_level(child);
        }
        if self.nodes[idx].level == self.depth {
            self.delete(idx);
        }
    }

    /// Reduce the tree to at most `max_colors` color nodes.
    ///
    /// Returns the number of color nodes left.
    fn reduce(&mut self, max_colors: usize, n_samples: u64) -> usize {
        let mut threshold = (n_samples / (max_colors as u64 * 8)).max(1);
        let mut color_count = self.leaf_count();
        let mut rounds = 0;

        while color_count > max_colors {
            let mut ctx = ReduceContext {
                threshold,
                color_count: 0,
                new_min: u64::MAX,
            };
            self.reduce_sparse_nodes(ROOT, &mut ctx);
            color_count = ctx.color_count;
            threshold = ctx.new_min;
            rounds += 1;
        }

        log::debug!(
            "octree: {} colors after {} reduction rounds, {} nodes at depth {}",
            color_count,
            rounds,
            self.node_count,
            self.depth
        );
        color_count
    }

    /// Post-order pass removing every node with at most `threshold` pixels.
    /// The root is never removed.
    fn reduce_sparse_nodes(&mut self, idx: usize, ctx: &mut ReduceContext) {
        let children = self.nodes[idx].children;
        for child in children.into_iter().flatten() {
            self.reduce_sparse_nodes(child, ctx);
        }

        let node = &self.nodes[idx];
        if idx != ROOT && node.n_pixels <= ctx.threshold {
            self.delete(idx);
        } else {
            if node.n_unique > 0 {
                ctx.color_count += 1;
            }
            ctx.new_min = ctx.new_min.min(node.n_pixels);
        }
    }

    /// Number of nodes that represent pixels directly
    fn leaf_count(&self) -> usize {
        self.live_nodes().filter(|&i| self.nodes[i].n_unique > 0).count()
    }

    /// Indices of all reachable nodes, parents before children
    fn live_nodes(&self) -> impl Iterator<Item = usize> + '_ {
        let mut stack = vec![ROOT];
        std::iter::from_fn(move || {
            let idx = stack.pop()?;
            stack.extend(self.nodes[idx].children.iter().rev().flatten());
            Some(idx)
        })
    }

    /// Collect mean colors in post-order, recording each node's palette index.
    fn collect_colors(&mut self, idx: usize, palette: &mut Palette) {
        let children = self.nodes[idx].children;
        for child in children.into_iter().flatten() {
            self.collect_colors(child, palette);
        }

        let node = &mut self.nodes[idx];
        if node.n_unique > 0 {
            let n = node.n_unique as f64;
            let avg = node.total.map(|t| (t as f64 / n) as f32);
            node.color_idx = Some(palette.push(avg));
        }
    }

    /// Palette index of the deepest node on a color's path
    fn find_node_index(&self, pixel: u32) -> Option<usize> {
        let rgb = color::to_triple(pixel);
        let mut node = &self.nodes[ROOT];
        while let Some(child) = node.children[node.child_id(rgb)] {
            node = &self.nodes[child];
        }
        node.color_idx
    }
}

/// Quantizer built from a reduced octree
#[derive(Debug, Clone)]
pub struct OctreeQuantizer {
    tree: Octree,
    palette: Palette,
    quick_quantization: bool,
}

impl OctreeQuantizer {
    /// Build and reduce the tree for a pixel sequence.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::InvalidParameters`] if `max_colors` is not in
    /// `1..=256`.
    pub fn new(pixels: &[u32], options: &OctreeOptions) -> ColorResult<Self> {
        options.validate()?;
        let mut tree = Octree::new(initial_depth(options.max_colors), MAX_NODES);
        tree.add_pixels(pixels);
        tree.reduce(options.max_colors as usize, pixels.len() as u64);

        let mut palette = Palette::new();
        tree.collect_colors(ROOT, &mut palette);

        Ok(Self {
            tree,
            palette,
            quick_quantization: options.quick_quantization,
        })
    }

    /// Build and reduce the tree for an image
    pub fn from_image(image: &RgbImage, options: &OctreeOptions) -> ColorResult<Self> {
        Self::new(image.pixels(), options)
    }

    /// Switch between tree lookup and exhaustive palette search.
    pub fn set_quick_quantization(&mut self, quick: bool) {
        self.quick_quantization = quick;
    }

    /// Whether colors are classified by tree lookup
    pub fn quick_quantization(&self) -> bool {
        self.quick_quantization
    }

    /// Current tree depth (lowered when the node limit forced pruning)
    pub fn depth(&self) -> u32 {
        self.tree.depth
    }

    /// Number of live tree nodes
    pub fn node_count(&self) -> usize {
        self.tree.node_count
    }

    /// Number of nodes carrying a palette color
    pub fn leaf_count(&self) -> usize {
        self.tree.leaf_count()
    }
}

impl ColorQuantizer for OctreeQuantizer {
    fn color_map(&self) -> &Palette {
        &self.palette
    }

    /// With quick quantization the reduced tree is descended as far as the
    /// color's path goes. Colors that were not in the source pixels may end
    /// on a node without a palette color, which yields
    /// [`ColorError::UnassignedColor`].
    fn find_color_index(&self, rgb: u32, palette: &Palette) -> ColorResult<usize> {
        if self.quick_quantization {
            self.tree
                .find_node_index(rgb)
                .ok_or(ColorError::UnassignedColor {
                    rgb: color::strip_alpha(rgb),
                })
        } else {
            nearest_color_index(rgb, palette)
        }
    }
}

/// Quantize an image using an octree
pub fn octree_quant(image: &RgbImage, options: &OctreeOptions) -> ColorResult<IndexedImage> {
    OctreeQuantizer::from_image(image, options)?.quantize(image)
}
