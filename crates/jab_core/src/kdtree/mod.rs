//! Median-split k-d tree over LAB colors, for nearest-neighbor palette
//! classification during decode.
//!
//! Built once per palette (at most 128 points) by a full sort at each level
//! on the cyclic axis `depth % 3`, rather than a partial `nth_element`-style
//! selection — the trees here are small enough that the simplicity is worth
//! more than the asymptotic difference.

use crate::color::Lab;

/// One indexed point in the tree: a LAB color plus the palette index it
/// classifies to.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ColorPoint {
	lab: Lab,
	index: usize,
}

fn axis_value(lab: Lab, axis: usize) -> f64 {
	match axis % 3 {
		0 => lab.l,
		1 => lab.a,
		_ => lab.b,
	}
}

#[derive(Debug)]
enum Node {
	Leaf,
	Split {
		point: ColorPoint,
		axis: usize,
		left: Box<Node>,
		right: Box<Node>,
	},
}

/// A k-d tree over a fixed set of LAB colors, supporting nearest-neighbor
/// search by ΔE76 distance.
#[derive(Debug)]
pub struct KdTree {
	root: Node,
}

impl KdTree {
	/// Builds a tree from `(lab, index)` pairs. `index` is typically a
	/// palette slot; duplicate LAB values are permitted.
	pub fn build(points: impl IntoIterator<Item = (Lab, usize)>) -> Self {
		let mut points: Vec<ColorPoint> = points
			.into_iter()
			.map(|(lab, index)| ColorPoint {
				lab,
				index,
			})
			.collect();
		let root = build_recursive(&mut points, 0);
		Self {
			root,
		}
	}

	/// Finds the palette index of the nearest color to `query` by ΔE76
	/// (Euclidean) distance. Returns `None` only if the tree is empty.
	pub fn nearest(&self, query: Lab) -> Option<usize> {
		let mut best: Option<(f64, usize)> = None;
		search_recursive(&self.root, query, &mut best);
		best.map(|(_, index)| index)
	}
}

fn build_recursive(points: &mut [ColorPoint], depth: usize) -> Node {
	if points.is_empty() {
		return Node::Leaf;
	}
	let axis = depth % 3;
	points.sort_by(|a, b| axis_value(a.lab, axis).total_cmp(&axis_value(b.lab, axis)));

	let mid = points.len() / 2;
	let point = points[mid];
	let (left_points, right_points) = {
		let (left, rest) = points.split_at_mut(mid);
		let (_, right) = rest.split_at_mut(1);
		(left, right)
	};

	Node::Split {
		point,
		axis,
		left: Box::new(build_recursive(left_points, depth + 1)),
		right: Box::new(build_recursive(right_points, depth + 1)),
	}
}

fn search_recursive(node: &Node, query: Lab, best: &mut Option<(f64, usize)>) {
	let Node::Split {
		point,
		axis,
		left,
		right,
	} = node
	else {
		return;
	};

	let dist_sq = {
		let dl = query.l - point.lab.l;
		let da = query.a - point.lab.a;
		let db = query.b - point.lab.b;
		dl * dl + da * da + db * db
	};
	if best.is_none_or(|(best_dist, _)| dist_sq < best_dist) {
		*best = Some((dist_sq, point.index));
	}

	let axis_dist = axis_value(query, *axis) - axis_value(point.lab, *axis);
	let (near, far) = if axis_dist < 0.0 { (left, right) } else { (right, left) };

	search_recursive(near, query, best);

	let should_search_far = match best {
		Some((best_dist, _)) => axis_dist * axis_dist < *best_dist,
		None => true,
	};
	if should_search_far {
		search_recursive(far, query, best);
	}
}
