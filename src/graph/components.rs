use std::collections::VecDeque;

use crate::graph::Adjacency;

impl Adjacency {
    /// Label each node with the index of its connected component.
    ///
    /// Components are numbered in order of their smallest node.
    pub fn component_labels(&self) -> (usize, Vec<usize>) {
        let mut labels = vec![usize::MAX; self.node_count()];
        let mut count = 0;

        for start in 0..self.node_count() {
            if labels[start] != usize::MAX { continue }

            labels[start] = count;
            let mut queue = VecDeque::from([start]);
            while let Some(u) = queue.pop_front() {
                for v in self.neighbors(u) {
                    if labels[v] == usize::MAX {
                        labels[v] = count;
                        queue.push_back(v);
                    }
                }
            }
            count += 1;
        }

        (count, labels)
    }

    /// Connected components as sorted node lists.
    pub fn components(&self) -> Vec<Vec<usize>> {
        let (count, labels) = self.component_labels();
        let mut components = vec![Vec::new(); count];
        labels.iter().enumerate().for_each(|(node, &c)| components[c].push(node));
        components
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_of_disconnected_graph() {
        let graph = Adjacency::new(5, &[vec![1], vec![0], vec![3], vec![2], vec![]]);
        assert_eq!(graph.components(), vec![vec![0, 1], vec![2, 3], vec![4]]);
        assert_eq!(graph.component_labels(), (3, vec![0, 0, 1, 1, 2]));
    }

    #[test]
    fn path_is_one_component() {
        let graph = Adjacency::new(4, &[vec![1], vec![0, 2], vec![1, 3], vec![2]]);
        assert_eq!(graph.components(), vec![vec![0, 1, 2, 3]]);
    }

    #[test]
    fn empty_graph_has_no_components() {
        assert!(Adjacency::new(0, &[]).components().is_empty());
    }
}
