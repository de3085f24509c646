//! Octree color quantization.
//!
//! Each color is inserted into an 8-ary trie with one level per bit-plane of its channels,
//! most significant bit first, so that a full path of eight branches ends in a leaf
//! holding exactly one distinct color.
//!
//! Reducing the tree merges whole subtrees into single leaves,
//! starting from the parents of the deepest leaves and working up toward the root.
//! Within a level, the subtrees with the fewest leaves are merged first.
//! A merged leaf has the count-weighted average color and the summed count of the leaves it replaced,
//! so the total weight of the tree never changes.

use crate::{
    colorspace::{srgb_components, srgb_from_components},
    darkness::is_dark_luminance,
    filter, ColorHistogram, OctreeOptions, PaletteResult, PaletteSettings, ThemeColor,
};
use palette::Srgb;

/// The number of bit-planes, and so the depth of a full-resolution leaf.
pub const DEPTH: usize = 8;

/// An index into the node arena.
type NodeIndex = usize;

/// The index of the root node.
const ROOT: NodeIndex = 0;

/// A branch or leaf of an [`Octree`].
#[derive(Debug, Clone, Default)]
struct Node {
    /// One optional child per octant of the next bit-plane.
    children: [Option<NodeIndex>; 8],
    /// The count-weighted sum of the colors in this leaf.
    sum: [f64; 3],
    /// The number of pixels in this leaf. Branches always have a count of zero.
    count: u64,
    /// Whether this node is still reachable from the root.
    live: bool,
}

impl Node {
    /// An empty live node.
    fn new() -> Self {
        Self { live: true, ..Self::default() }
    }

    fn is_leaf(&self) -> bool {
        self.count > 0
    }

    /// The average color of a leaf.
    fn color(&self) -> Srgb<u8> {
        #[allow(clippy::cast_precision_loss)]
        let n = self.count as f64;
        #[allow(clippy::cast_possible_truncation)]
        let rgb = self.sum.map(|s| (s / n) as f32);
        srgb_from_components(rgb)
    }
}

/// Returns the octant of `color` at the given level (`0` is the most significant bit).
#[inline]
fn branch(color: [u8; 3], level: usize) -> usize {
    let mask = 0x80 >> level;
    let [r, g, b] = color.map(|c| usize::from(c & mask != 0));
    (r << 2) | (g << 1) | b
}

/// An arena allocated octree over 24-bit colors.
///
/// # Examples
/// ```
/// # use impressionist::octree::Octree;
/// # use palette::Srgb;
/// let mut octree = Octree::new();
/// octree.add_color_count(Srgb::new(255, 0, 0), 3);
/// octree.add_color_count(Srgb::new(254, 0, 0), 1);
/// octree.add_color(Srgb::new(0, 0, 255));
/// assert_eq!(octree.num_leaves(), 3);
///
/// octree.quantize(2);
/// assert_eq!(octree.num_leaves(), 2);
/// assert_eq!(octree.palette(1), vec![Srgb::new(255, 0, 0)]);
/// ```
#[derive(Debug, Clone)]
pub struct Octree {
    /// The node arena, with the root at index `0`.
    nodes: Vec<Node>,
    /// The nodes created at each depth below the root, in creation order.
    /// `levels[i]` holds the nodes at depth `i + 1`.
    levels: [Vec<NodeIndex>; DEPTH],
    /// The current number of leaves.
    num_leaves: usize,
}

impl Default for Octree {
    fn default() -> Self {
        Self::new()
    }
}

impl Octree {
    /// Creates an empty [`Octree`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new()],
            levels: Default::default(),
            num_leaves: 0,
        }
    }

    /// Creates an [`Octree`] holding every color of a histogram with its count.
    #[must_use]
    pub fn from_histogram(histogram: &ColorHistogram) -> Self {
        let mut octree = Self::new();
        for (color, count) in histogram.iter() {
            octree.add_color_count(color, count);
        }
        octree
    }

    /// Inserts a single pixel of the given color.
    pub fn add_color(&mut self, color: Srgb<u8>) {
        self.add_color_count(color, 1);
    }

    /// Inserts `count` pixels of the given color. A count of zero is ignored.
    ///
    /// If the color falls into a leaf that was produced by a merge,
    /// the count is added to that leaf.
    pub fn add_color_count(&mut self, color: Srgb<u8>, count: u32) {
        if count == 0 {
            return;
        }

        let key: [u8; 3] = color.into();
        let mut node = ROOT;
        for level in 0..DEPTH {
            if self.nodes[node].is_leaf() {
                break;
            }
            let octant = branch(key, level);
            node = match self.nodes[node].children[octant] {
                Some(child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(Node::new());
                    self.nodes[node].children[octant] = Some(child);
                    self.levels[level].push(child);
                    child
                }
            };
        }

        let leaf = &mut self.nodes[node];
        if !leaf.is_leaf() {
            self.num_leaves += 1;
        }
        let w = f64::from(count);
        for (s, c) in leaf.sum.iter_mut().zip(srgb_components(color)) {
            *s += w * f64::from(c);
        }
        leaf.count += u64::from(count);
    }

    /// The current number of leaves (distinct output colors).
    #[must_use]
    pub fn num_leaves(&self) -> usize {
        self.num_leaves
    }

    /// The sum of the counts of all leaves.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.leaf_nodes().map(|i| self.nodes[i].count).sum()
    }

    /// Visits every leaf in depth-first octant order.
    fn leaf_nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        let mut stack = vec![ROOT];
        std::iter::from_fn(move || {
            while let Some(node) = stack.pop() {
                let node_ref = &self.nodes[node];
                if node_ref.is_leaf() {
                    return Some(node);
                }
                stack.extend(node_ref.children.iter().rev().flatten());
            }
            None
        })
    }

    /// Returns the color and count of each leaf in depth-first octant order.
    #[must_use]
    pub fn leaves(&self) -> Vec<(Srgb<u8>, u64)> {
        self.leaf_nodes()
            .map(|i| (self.nodes[i].color(), self.nodes[i].count))
            .collect()
    }

    /// Returns the number of leaves under `node`.
    fn subtree_leaves(&self, node: NodeIndex) -> usize {
        let node = &self.nodes[node];
        if node.is_leaf() {
            1
        } else {
            node.children
                .iter()
                .flatten()
                .map(|&child| self.subtree_leaves(child))
                .sum()
        }
    }

    /// Collapses the subtree under `node` into a single leaf.
    fn merge(&mut self, node: NodeIndex) {
        let mut sum = [0.0; 3];
        let mut count = 0;
        let mut stack = self.nodes[node].children.iter().flatten().copied().collect::<Vec<_>>();
        while let Some(descendant) = stack.pop() {
            let d = &mut self.nodes[descendant];
            d.live = false;
            for (s, x) in sum.iter_mut().zip(d.sum) {
                *s += x;
            }
            count += d.count;
            stack.extend(d.children.iter().flatten());
        }

        let n = &mut self.nodes[node];
        n.children = [None; 8];
        n.sum = sum;
        n.count = count;
    }

    /// Merges subtrees until at most `max_colors` leaves remain.
    ///
    /// Merging starts with the parents of full-depth leaves and moves toward the root.
    /// At each level, subtrees are visited in ascending order of their leaf count
    /// and are merged only if doing so removes no more leaves than still need to be removed.
    ///
    /// The root is never merged, so up to eight leaves may remain even if `max_colors` is smaller.
    /// A `max_colors` at or above [`num_leaves`](Self::num_leaves) leaves the tree unchanged.
    pub fn quantize(&mut self, max_colors: usize) {
        let target = max_colors.max(1);
        let mut deficit = self.num_leaves.saturating_sub(target);
        if deficit == 0 {
            return;
        }

        let before = self.num_leaves;
        for level in (0..DEPTH - 1).rev() {
            let mut candidates = self.levels[level]
                .iter()
                .copied()
                .filter(|&node| self.nodes[node].live && !self.nodes[node].is_leaf())
                .map(|node| (self.subtree_leaves(node), node))
                .collect::<Vec<_>>();

            candidates.sort_by_key(|&(leaves, _)| leaves);

            for (leaves, node) in candidates {
                let cost = leaves - 1;
                if cost == 0 || cost > deficit {
                    continue;
                }
                self.merge(node);
                deficit -= cost;
                self.num_leaves -= cost;
                if deficit == 0 {
                    break;
                }
            }

            for nodes in &mut self.levels[level + 1..] {
                nodes.retain(|&node| self.nodes[node].live);
            }

            if deficit == 0 {
                break;
            }
        }

        if deficit > 0 {
            log::debug!(
                "octree reduction to {target} colors stopped at {} leaves",
                self.num_leaves
            );
        } else {
            log::debug!("octree reduced from {before} to {} leaves", self.num_leaves);
        }
    }

    /// Returns the colors of up to `k` leaves, ordered by descending count.
    ///
    /// Leaves with equal counts keep their depth-first octant order.
    #[must_use]
    pub fn palette(&self, k: usize) -> Vec<Srgb<u8>> {
        let mut leaves = self.leaf_nodes().collect::<Vec<_>>();
        leaves.sort_by_key(|&i| std::cmp::Reverse(self.nodes[i].count));
        leaves
            .into_iter()
            .take(k)
            .map(|i| self.nodes[i].color())
            .collect()
    }

    /// Returns the count-weighted average color of all leaves,
    /// or `None` if the tree is empty.
    ///
    /// Merging preserves the total weighted sum, so this does not change under [`quantize`](Self::quantize).
    #[must_use]
    pub fn theme(&self) -> Option<Srgb<u8>> {
        let mut sum = [0.0; 3];
        let mut count = 0;
        for i in self.leaf_nodes() {
            for (s, x) in sum.iter_mut().zip(self.nodes[i].sum) {
                *s += x;
            }
            count += self.nodes[i].count;
        }

        (count > 0).then(|| Node { sum, count, ..Node::new() }.color())
    }

    /// Returns the color of the leaf that `color` falls into,
    /// or `None` if no inserted color shares its path.
    #[must_use]
    pub fn map_color(&self, color: Srgb<u8>) -> Option<Srgb<u8>> {
        let key: [u8; 3] = color.into();
        let mut node = ROOT;
        for level in 0..DEPTH {
            if self.nodes[node].is_leaf() {
                break;
            }
            node = self.nodes[node].children[branch(key, level)]?;
        }
        let node = &self.nodes[node];
        node.is_leaf().then(|| node.color())
    }
}

/// Computes the theme color: the count-weighted average of the whole histogram.
///
/// The theme color is dark if its CIE lightness is at most `55`.
#[must_use]
pub fn theme_color(
    histogram: &ColorHistogram,
    settings: &PaletteSettings,
    _options: &OctreeOptions,
) -> ThemeColor {
    let histogram = filter::without_white(histogram, settings.ignore_white);
    let color = Octree::from_histogram(&histogram)
        .theme()
        .unwrap_or(histogram.colors()[0]);

    ThemeColor { color, is_dark: is_dark_luminance(color) }
}

/// Computes a palette by quantizing the half of the histogram
/// that matches the theme color's darkness.
#[must_use]
pub fn palette(
    histogram: &ColorHistogram,
    settings: &PaletteSettings,
    options: &OctreeOptions,
) -> PaletteResult {
    let ignore_white = filter::should_ignore_white(histogram, settings.ignore_white);
    let settings = PaletteSettings { ignore_white, ..*settings };

    let theme = theme_color(histogram, &settings, options);
    let half = filter::bisect(histogram, theme.is_dark, ignore_white, is_dark_luminance);

    let k = settings.palette_size.as_usize();
    let mut octree = Octree::from_histogram(&half);
    octree.quantize(k);
    let colors = octree.palette(k);
    let colors = if colors.is_empty() { vec![theme.color] } else { colors };

    PaletteResult::padded(&colors, settings.palette_size, theme.is_dark, theme)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tests::*;

    fn settings(k: u16) -> PaletteSettings {
        PaletteSettings::new(k.try_into().unwrap())
    }

    #[test]
    fn octants() {
        assert_eq!(branch([255, 0, 0], 0), 4);
        assert_eq!(branch([0, 255, 0], 0), 2);
        assert_eq!(branch([0, 0, 255], 0), 1);
        assert_eq!(branch([0x40, 0x40, 0x00], 0), 0);
        assert_eq!(branch([0x40, 0x40, 0x00], 1), 6);
        assert_eq!(branch([1, 0, 1], 7), 5);
    }

    #[test]
    fn one_leaf_per_distinct_color() {
        let histogram = ColorHistogram::from_pixels(&test_data_1024()).unwrap();
        let octree = Octree::from_histogram(&histogram);
        assert_eq!(octree.num_leaves(), histogram.num_colors());
        assert_eq!(octree.total_count(), histogram.total_count());

        let mut leaves = octree.leaves();
        leaves.sort_by_key(|&(color, _)| <[u8; 3]>::from(color));
        let expected = histogram.iter().map(|(c, n)| (c, u64::from(n))).collect::<Vec<_>>();
        assert_eq!(leaves, expected);
    }

    #[test]
    fn zero_count_is_ignored() {
        let mut octree = Octree::new();
        octree.add_color_count(Srgb::new(1, 2, 3), 0);
        assert_eq!(octree.num_leaves(), 0);
        assert_eq!(octree.theme(), None);
        assert_eq!(octree.map_color(Srgb::new(1, 2, 3)), None);
    }

    #[test]
    fn repeated_insertion_accumulates() {
        let mut octree = Octree::new();
        let color = Srgb::new(12, 34, 56);
        octree.add_color(color);
        octree.add_color_count(color, 4);
        assert_eq!(octree.leaves(), vec![(color, 5)]);
    }

    #[test]
    fn quantize_to_distinct_count_is_noop() {
        let histogram = ColorHistogram::from_pixels(&test_data_256()).unwrap();
        let mut octree = Octree::from_histogram(&histogram);
        let before = octree.leaves();
        octree.quantize(histogram.num_colors());
        assert_eq!(octree.leaves(), before);
        octree.quantize(usize::MAX);
        assert_eq!(octree.leaves(), before);
    }

    #[test]
    fn quantize_preserves_weight() {
        let histogram = ColorHistogram::from_pixels(&test_data_1024()).unwrap();
        let mut octree = Octree::from_histogram(&histogram);
        let theme = octree.theme();
        for k in [512, 200, 64, 16, 5, 1] {
            let before = octree.num_leaves();
            octree.quantize(k);
            assert!(octree.num_leaves() <= before);
            assert_eq!(octree.num_leaves(), octree.leaves().len());
            assert_eq!(octree.total_count(), histogram.total_count());
            assert_eq!(octree.theme(), theme);
        }
        assert!(octree.num_leaves() <= 8);
    }

    #[test]
    fn merged_leaf_is_weighted_average() {
        let mut octree = Octree::new();
        octree.add_color_count(Srgb::new(0, 0, 0), 3);
        octree.add_color_count(Srgb::new(4, 4, 4), 1);
        octree.add_color_count(Srgb::new(255, 255, 255), 1);
        octree.quantize(2);
        assert_eq!(octree.num_leaves(), 2);
        assert_eq!(
            octree.leaves(),
            vec![(Srgb::new(1, 1, 1), 4), (Srgb::new(255, 255, 255), 1)]
        );
        assert_eq!(octree.map_color(Srgb::new(4, 4, 4)), Some(Srgb::new(1, 1, 1)));
        assert_eq!(octree.map_color(Srgb::new(2, 3, 1)), Some(Srgb::new(1, 1, 1)));
        assert_eq!(octree.map_color(Srgb::new(255, 255, 255)), Some(Srgb::new(255, 255, 255)));
        assert_eq!(octree.map_color(Srgb::new(255, 0, 0)), None);
    }

    #[test]
    fn smallest_subtrees_merge_first() {
        let mut octree = Octree::new();
        // two leaves under one depth-7 parent
        octree.add_color_count(Srgb::new(10, 10, 10), 1);
        octree.add_color_count(Srgb::new(11, 10, 10), 1);
        // three leaves under another
        octree.add_color_count(Srgb::new(200, 200, 200), 1);
        octree.add_color_count(Srgb::new(201, 200, 200), 1);
        octree.add_color_count(Srgb::new(200, 201, 200), 1);
        octree.quantize(4);
        assert_eq!(octree.num_leaves(), 4);
        assert_eq!(octree.map_color(Srgb::new(11, 10, 10)), octree.map_color(Srgb::new(10, 10, 10)));
        assert_ne!(
            octree.map_color(Srgb::new(201, 200, 200)),
            octree.map_color(Srgb::new(200, 201, 200))
        );
    }

    #[test]
    fn insertion_after_merge() {
        let mut octree = Octree::new();
        octree.add_color_count(Srgb::new(0, 0, 0), 1);
        octree.add_color_count(Srgb::new(1, 1, 1), 1);
        octree.add_color_count(Srgb::new(255, 255, 255), 1);
        octree.quantize(2);
        octree.add_color_count(Srgb::new(0, 1, 0), 2);
        assert_eq!(octree.num_leaves(), 2);
        assert_eq!(octree.total_count(), 5);
        octree.quantize(1);
        assert_eq!(octree.total_count(), 5);
    }

    #[test]
    fn palette_orders_by_weight() {
        let histogram = ColorHistogram::new([
            (Srgb::new(255, 255, 255), 100),
            (Srgb::new(0, 0, 0), 50),
            (Srgb::new(255, 0, 0), 30),
        ])
        .unwrap();
        let octree = Octree::from_histogram(&histogram);
        assert_eq!(
            octree.palette(5),
            vec![Srgb::new(255, 255, 255), Srgb::new(0, 0, 0), Srgb::new(255, 0, 0)]
        );
        assert_eq!(octree.palette(1), vec![Srgb::new(255, 255, 255)]);
    }

    #[test]
    fn theme_is_weighted_average() {
        let histogram = ColorHistogram::new([
            (Srgb::new(255, 255, 255), 100),
            (Srgb::new(0, 0, 0), 50),
            (Srgb::new(255, 0, 0), 30),
        ])
        .unwrap();
        let theme = theme_color(&histogram, &settings(2), &OctreeOptions::new());
        // (255 * 130 / 180, 255 * 100 / 180, 255 * 100 / 180)
        assert_eq!(theme.color, Srgb::new(184, 142, 142));
        assert!(!theme.is_dark);
    }

    #[test]
    fn light_palette() {
        let histogram = ColorHistogram::new([
            (Srgb::new(255, 255, 255), 100),
            (Srgb::new(0, 0, 0), 50),
            (Srgb::new(255, 255, 0), 30),
        ])
        .unwrap();
        let result = palette(&histogram, &settings(2), &OctreeOptions::new());
        assert!(!result.palette_is_dark);
        assert_eq!(result.palette, vec![Srgb::new(255, 255, 255), Srgb::new(255, 255, 0)]);
    }

    #[test]
    fn single_color_is_repeated() {
        let color = Srgb::new(10, 10, 10);
        let histogram = ColorHistogram::new([(color, 5)]).unwrap();
        let settings = PaletteSettings { ignore_white: true, ..settings(4) };
        let result = palette(&histogram, &settings, &OctreeOptions::new());
        assert_eq!(result.palette, vec![color; 4]);
        assert_eq!(result.theme, ThemeColor { color, is_dark: true });
    }

    #[test]
    fn palette_has_exact_length() {
        let histogram = ColorHistogram::from_pixels(&test_data_1024()).unwrap();
        for k in [1, 2, 7, 32, 256] {
            let result = palette(&histogram, &settings(k), &OctreeOptions::new());
            assert_eq!(result.palette.len(), usize::from(k));
        }
    }
}
