use ndarray::Array2;

/// Symmetric, irreflexive adjacency relation over the units of a
/// [`UnitTable`](crate::UnitTable), in compressed sparse row format.
///
/// Node `i` is the unit at canonical position `i` of the table the relation
/// was built against. Neighbor lists are sorted and free of duplicates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Adjacency {
    size: usize,
    offsets: Vec<u32>,
    edges: Vec<u32>,
}

impl Adjacency {
    /// Construct a relation from per-node neighbor lists.
    ///
    /// Panics if the lists are not symmetric, contain self loops, or are not
    /// strictly increasing.
    pub(crate) fn new(num_nodes: usize, edges: &[Vec<u32>]) -> Self {
        assert!(edges.len() == num_nodes, "edges.len() must equal num_nodes");
        edges.iter().enumerate().for_each(|(u, list)| {
            assert!(list.windows(2).all(|w| w[0] < w[1]), "edges[{u}] must be strictly increasing");
            list.iter().for_each(|&v| {
                assert!(v as usize != u, "edges[{u}] must not contain a self loop");
                assert!((v as usize) < num_nodes, "edges[{u}] contains out-of-range node {v}");
                assert!(edges[v as usize].binary_search(&(u as u32)).is_ok(), "edge {u}-{v} must be symmetric");
            });
        });

        Self {
            size: num_nodes,
            offsets: std::iter::once(0u32).chain(
                edges.iter()
                    .map(|v| v.len() as u32)
                    .scan(0u32, |acc, len| {*acc += len; Some(*acc)})
            ).collect::<Vec<u32>>(),
            edges: edges.iter().flatten().copied().collect(),
        }
    }

    /// Get the number of nodes (units).
    #[inline] pub fn node_count(&self) -> usize { self.size }

    /// Get the number of unordered adjacent pairs.
    #[inline] pub fn pair_count(&self) -> usize { self.edges.len() / 2 }

    /// Get the range of edges for a given node.
    #[inline]
    fn range(&self, node: usize) -> std::ops::Range<usize> {
        self.offsets[node] as usize .. self.offsets[node + 1] as usize
    }

    /// Get the degree (number of neighbors) of a given node.
    #[inline] pub fn degree(&self, node: usize) -> usize { self.range(node).len() }

    /// Get an iterator over the neighbors of a given node, in increasing order.
    #[inline]
    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.range(node).map(move |v| self.edges[v] as usize)
    }

    /// Check whether `u` and `v` share a border. Always false for `u == v`.
    pub fn adjacent(&self, u: usize, v: usize) -> bool {
        u != v && self.edges[self.range(u)].binary_search(&(v as u32)).is_ok()
    }

    /// Iterate over unordered adjacent pairs `(u, v)` with `u < v`.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.size).flat_map(move |u| {
            self.neighbors(u).filter(move |&v| v > u).map(move |v| (u, v))
        })
    }

    /// Nodes with no recorded neighbor.
    pub fn isolated(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.size).filter(|&u| self.degree(u) == 0)
    }

    /// Dense square boolean matrix form of the relation.
    pub fn to_matrix(&self) -> Array2<bool> {
        let mut matrix = Array2::from_elem((self.size, self.size), false);
        self.pairs().for_each(|(u, v)| {
            matrix[[u, v]] = true;
            matrix[[v, u]] = true;
        });
        matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_graph() -> Adjacency {
        Adjacency::new(
            4,
            &[
                vec![1, 2],       // 0
                vec![0, 2],       // 1
                vec![0, 1, 3],    // 2
                vec![2],          // 3
            ],
        )
    }

    #[test]
    fn csr_graph_construction() {
        let graph = make_test_graph();

        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.pair_count(), 4);

        // Offsets are cumulative neighbor counts, len = nodes + 1
        assert_eq!(graph.offsets, vec![0, 2, 4, 7, 8]);
        assert_eq!(graph.edges, vec![1, 2, 0, 2, 0, 1, 3, 2]);
        assert_eq!(*graph.offsets.last().unwrap() as usize, graph.edges.len());
    }

    #[test]
    fn degree_matches_offsets() {
        let graph = make_test_graph();

        assert_eq!(graph.degree(0), 2);
        assert_eq!(graph.degree(1), 2);
        assert_eq!(graph.degree(2), 3);
        assert_eq!(graph.degree(3), 1);
    }

    #[test]
    fn adjacency_is_symmetric_and_irreflexive() {
        let graph = make_test_graph();
        for u in 0..4 {
            assert!(!graph.adjacent(u, u));
            for v in 0..4 {
                assert_eq!(graph.adjacent(u, v), graph.adjacent(v, u));
            }
        }
        assert!(graph.adjacent(2, 3));
        assert!(!graph.adjacent(0, 3));
    }

    #[test]
    fn pairs_are_unordered_and_unique() {
        let graph = make_test_graph();
        assert_eq!(graph.pairs().collect::<Vec<_>>(), vec![(0, 1), (0, 2), (1, 2), (2, 3)]);
    }

    #[test]
    fn matrix_matches_relation() {
        let graph = make_test_graph();
        let matrix = graph.to_matrix();
        assert_eq!(matrix.dim(), (4, 4));
        assert_eq!(matrix, matrix.t());
        for u in 0..4 {
            assert!(!matrix[[u, u]]);
            for v in 0..4 { assert_eq!(matrix[[u, v]], graph.adjacent(u, v)) }
        }
    }

    #[test]
    fn isolated_nodes_have_zero_degree() {
        let graph = Adjacency::new(3, &[vec![1], vec![0], vec![]]);
        assert_eq!(graph.isolated().collect::<Vec<_>>(), vec![2]);
        assert!(graph.neighbors(2).next().is_none());
    }

    #[test]
    fn empty_graph_is_valid() {
        let graph = Adjacency::new(0, &[]);
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.pair_count(), 0);
        assert_eq!(graph.offsets, vec![0]);
    }

    #[test]
    #[should_panic(expected = "edges.len() must equal num_nodes")]
    fn new_panics_when_edges_len_mismatch() {
        Adjacency::new(0, &[vec![]]);
    }

    #[test]
    #[should_panic(expected = "must be symmetric")]
    fn new_panics_when_asymmetric() {
        Adjacency::new(2, &[vec![1], vec![]]);
    }

    #[test]
    #[should_panic(expected = "self loop")]
    fn new_panics_on_self_loop() {
        Adjacency::new(1, &[vec![0]]);
    }

    #[test]
    #[should_panic]
    fn degree_panics_for_out_of_bounds_node() {
        let graph = make_test_graph();
        graph.degree(graph.node_count());
    }
}
