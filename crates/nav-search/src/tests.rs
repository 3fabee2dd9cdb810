//! Unit tests for nav-search.

#[cfg(test)]
mod helpers {
    use nav_graph::SearchGraph;

    /// Undirected weighted graph over string handles.
    ///
    /// Costs are pure accumulated weight (Dijkstra ordering), and a blocked
    /// edge reports a negative cost.
    pub struct Table {
        pub edges:   Vec<(&'static str, &'static str, f32)>,
        pub blocked: Vec<(&'static str, &'static str)>,
    }

    impl Table {
        pub fn new(edges: &[(&'static str, &'static str, f32)]) -> Self {
            Self { edges: edges.to_vec(), blocked: Vec::new() }
        }

        pub fn block(mut self, a: &'static str, b: &'static str) -> Self {
            self.blocked.push((a, b));
            self
        }

        fn weight(&self, a: &str, b: &str) -> Option<f32> {
            self.edges
                .iter()
                .find(|&&(x, y, _)| (x == a && y == b) || (x == b && y == a))
                .map(|&(_, _, w)| w)
        }

        fn is_blocked(&self, a: &str, b: &str) -> bool {
            self.blocked.iter().any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
        }
    }

    impl SearchGraph for Table {
        type Node = &'static str;

        fn neighbors(&self, node: &'static str, out: &mut Vec<&'static str>) {
            for &(a, b, _) in &self.edges {
                if a == node {
                    out.push(b);
                } else if b == node {
                    out.push(a);
                }
            }
        }

        fn distance(&self, a: &'static str, b: &'static str) -> f32 {
            self.weight(a, b).unwrap_or(0.0)
        }

        fn cost(&self, from: &'static str, to: &'static str, _goal: &'static str, path_len: f32) -> Option<f32> {
            if from == to {
                return Some(0.0);
            }
            if self.is_blocked(from, to) {
                return Some(-1.0);
            }
            self.weight(from, to).map(|w| path_len + w)
        }
    }

    /// a – b – c – d – e – f, unit weights.
    pub fn line() -> Table {
        Table::new(&[
            ("a", "b", 1.0),
            ("b", "c", 1.0),
            ("c", "d", 1.0),
            ("d", "e", 1.0),
            ("e", "f", 1.0),
        ])
    }
}

// ── Node pool ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod pool {
    use crate::NodePool;

    #[test]
    fn alloc_links_children() {
        let mut pool = NodePool::new();
        let root = pool.alloc('r', None, 0.0, 0.0);
        let a = pool.alloc('a', Some(root), 1.0, 1.0);
        let b = pool.alloc('b', Some(a), 2.0, 2.0);

        assert_eq!(pool.len(), 3);
        assert_eq!(pool.children(root), &[a]);
        assert_eq!(pool.children(a), &[b]);
        assert_eq!(pool.get(b).parent, Some(a));
        assert_eq!(pool.depth(b), 3);
        assert_eq!(pool.ancestors(b).collect::<Vec<_>>(), vec![b, a, root]);
    }

    #[test]
    fn reset_recycles_slots() {
        let mut pool = NodePool::new();
        let root = pool.alloc(0u32, None, 0.0, 0.0);
        for i in 1..10 {
            pool.alloc(i, Some(root), i as f32, i as f32);
        }
        assert_eq!(pool.allocated(), 10);

        pool.reset();
        assert!(pool.is_empty());

        let fresh = pool.alloc(42, None, 0.0, 0.0);
        assert_eq!(fresh, 0);
        assert!(pool.children(fresh).is_empty(), "recycled slot must drop old children");
        assert_eq!(pool.allocated(), 10);
    }

    #[test]
    fn reparent_moves_between_child_lists() {
        let mut pool = NodePool::new();
        let root = pool.alloc('r', None, 0.0, 0.0);
        let a = pool.alloc('a', Some(root), 1.0, 1.0);
        let b = pool.alloc('b', Some(root), 5.0, 5.0);

        pool.reparent(b, a, 2.0, 2.0);
        assert_eq!(pool.children(root), &[a]);
        assert_eq!(pool.children(a), &[b]);
        assert_eq!(pool.get(b).parent, Some(a));
        assert_eq!(pool.get(b).cost, 2.0);
    }

    #[test]
    #[should_panic]
    fn stale_index_panics() {
        let mut pool = NodePool::new();
        pool.alloc(1u8, None, 0.0, 0.0);
        pool.reset();
        pool.get(0);
    }
}

// ── Open list ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod open {
    use crate::open::OpenList;

    #[test]
    fn pops_cheapest_first() {
        let mut open = OpenList::default();
        open.push(3.0, 0);
        open.push(1.0, 1);
        open.push(2.0, 2);
        assert_eq!(open.pop(), Some((1.0, 1)));
        assert_eq!(open.pop(), Some((2.0, 2)));
        assert_eq!(open.pop(), Some((3.0, 0)));
        assert_eq!(open.pop(), None);
    }

    #[test]
    fn equal_costs_are_fifo() {
        let mut open = OpenList::default();
        open.push(1.0, 10);
        open.push(1.0, 11);
        open.push(1.0, 12);
        assert_eq!(open.pop(), Some((1.0, 10)));
        assert_eq!(open.pop(), Some((1.0, 11)));
        assert_eq!(open.pop(), Some((1.0, 12)));
    }

    #[test]
    fn remove_specific_entry() {
        let mut open = OpenList::default();
        open.push(1.0, 0);
        open.push(2.0, 1);
        open.push(2.0, 2);
        assert!(open.remove(1, 2.0));
        assert!(!open.remove(1, 2.0));
        assert!(!open.remove(0, 5.0));
        assert_eq!(open.len(), 2);
        assert_eq!(open.pop(), Some((1.0, 0)));
        assert_eq!(open.pop(), Some((2.0, 2)));
        assert!(open.is_empty());
    }
}

// ── Engine ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod engine {
    use super::helpers::{line, Table};
    use crate::{BestFirstSearch, SearchStatus};

    #[test]
    fn single_node_search() {
        let g = line();
        let mut s = BestFirstSearch::new();
        s.begin_search(&g, "c", "c");
        assert_eq!(s.iterate(&g, 1), SearchStatus::Solved);
        assert_eq!(s.best_path(), Some(vec!["c"]));
    }

    #[test]
    fn skips_dead_end_branch() {
        // A–B, A–C, C–D
        let g = Table::new(&[("A", "B", 1.0), ("A", "C", 1.0), ("C", "D", 1.0)]);
        let mut s = BestFirstSearch::new();
        s.begin_search(&g, "A", "D");
        assert_eq!(s.iterate(&g, 100), SearchStatus::Solved);
        assert_eq!(s.best_path(), Some(vec!["A", "C", "D"]));
    }

    #[test]
    fn budget_of_one_resumes_to_same_result() {
        let g = line();

        let mut whole = BestFirstSearch::new();
        whole.begin_search(&g, "a", "f");
        assert_eq!(whole.iterate(&g, u32::MAX), SearchStatus::Solved);

        let mut sliced = BestFirstSearch::new();
        sliced.begin_search(&g, "a", "f");
        let mut calls = 0;
        let mut last_cost = -1.0;
        loop {
            calls += 1;
            match sliced.iterate(&g, 1) {
                SearchStatus::InProgress { cost_so_far } => {
                    assert!(cost_so_far >= last_cost, "costs must not decrease");
                    last_cost = cost_so_far;
                }
                SearchStatus::Solved => break,
                SearchStatus::Exhausted => panic!("line graph is connected"),
            }
        }
        assert_eq!(calls, 6, "one pop per node on a line");
        assert_eq!(sliced.steps(), whole.steps());
        assert_eq!(sliced.best_path(), whole.best_path());
    }

    #[test]
    fn zero_budget_does_no_work() {
        let g = line();
        let mut s = BestFirstSearch::new();
        s.begin_search(&g, "a", "f");
        assert_eq!(s.iterate(&g, 0), SearchStatus::InProgress { cost_so_far: 0.0 });
        assert_eq!(s.steps(), 0);
        assert_eq!(s.open_len(), 1);
    }

    #[test]
    fn unreachable_destination_is_exhausted() {
        let g = Table::new(&[("a", "b", 1.0), ("c", "d", 1.0)]);
        let mut s = BestFirstSearch::new();
        s.begin_search(&g, "a", "d");
        assert_eq!(s.iterate(&g, 100), SearchStatus::Exhausted);
        assert_eq!(s.closed_len(), 2);

        let path = s.best_path().unwrap();
        assert_eq!(path[0], "a");

        // Finished engines report the same status without doing work.
        let steps = s.steps();
        assert_eq!(s.iterate(&g, 100), SearchStatus::Exhausted);
        assert_eq!(s.steps(), steps);
    }

    #[test]
    fn solved_is_sticky() {
        let g = line();
        let mut s = BestFirstSearch::new();
        s.begin_search(&g, "a", "c");
        assert_eq!(s.iterate(&g, 100), SearchStatus::Solved);
        assert_eq!(s.open_len(), 0);
        assert_eq!(s.iterate(&g, 100), SearchStatus::Solved);
    }

    #[test]
    fn blocked_edge_is_skipped() {
        let g = Table::new(&[
            ("A", "B", 1.0),
            ("B", "D", 1.0),
            ("A", "C", 2.0),
            ("C", "D", 2.0),
        ])
        .block("B", "D");
        let mut s = BestFirstSearch::new();
        s.begin_search(&g, "A", "D");
        assert_eq!(s.iterate(&g, 100), SearchStatus::Solved);
        assert_eq!(s.best_path(), Some(vec!["A", "C", "D"]));
    }

    #[test]
    fn cheaper_route_reparents_open_node() {
        let g = Table::new(&[
            ("A", "B", 1.0),
            ("A", "C", 5.0),
            ("B", "C", 1.0),
            ("C", "D", 1.0),
        ]);
        let mut s = BestFirstSearch::new();
        s.begin_search(&g, "A", "D");
        assert_eq!(s.iterate(&g, 100), SearchStatus::Solved);
        assert_eq!(s.best_path(), Some(vec!["A", "B", "C", "D"]));

        let tree = s.tree();
        let find = |n: &str| tree.iter().position(|t| t.node == n).unwrap() as u32;
        let (a, b, c) = (find("A"), find("B"), find("C"));
        assert_eq!(tree.children(a), &[b]);
        assert_eq!(tree.children(b), &[c]);
        assert_eq!(tree.get(c).cost, 2.0);
        assert_eq!(tree.get(c).path_len, 2.0);
    }

    #[test]
    fn costlier_route_keeps_existing_parent() {
        let g = Table::new(&[
            ("A", "B", 1.0),
            ("A", "C", 1.0),
            ("B", "C", 5.0),
            ("C", "D", 1.0),
        ]);
        let mut s = BestFirstSearch::new();
        s.begin_search(&g, "A", "D");
        assert_eq!(s.iterate(&g, 100), SearchStatus::Solved);
        assert_eq!(s.best_path(), Some(vec!["A", "C", "D"]));

        let tree = s.tree();
        let root = tree.iter().position(|t| t.node == "A").unwrap() as u32;
        assert_eq!(tree.children(root).len(), 2);
    }

    #[test]
    fn no_search_has_no_path() {
        let g = line();
        let mut s: BestFirstSearch<&'static str> = BestFirstSearch::new();
        let mut buf = [None; 4];
        assert!(s.best_path().is_none());
        assert!(s.best_path_into(&mut buf).is_none());
        assert!(!s.is_active());
        assert_eq!(s.iterate(&g, 10), SearchStatus::Exhausted);
    }

    #[test]
    fn end_search_frees_engine_and_keeps_tree() {
        let g = line();
        let mut s = BestFirstSearch::new();
        s.begin_search(&g, "a", "f");
        assert!(s.is_active());
        assert_eq!(s.origin(), Some("a"));
        assert_eq!(s.destination(), Some("f"));
        s.iterate(&g, 100);
        let allocated = s.tree().allocated();

        s.end_search();
        assert!(!s.is_active());
        assert_eq!(s.origin(), None);
        assert_eq!(s.best_path().unwrap().len(), 6);

        s.begin_search(&g, "f", "a");
        assert_eq!(s.tree().len(), 1);
        assert_eq!(s.tree().allocated(), allocated);
        assert_eq!(s.iterate(&g, 100), SearchStatus::Solved);
        assert_eq!(s.best_path(), Some(vec!["f", "e", "d", "c", "b", "a"]));
    }
}

// ── Fixed-buffer path output ──────────────────────────────────────────────────

#[cfg(test)]
mod path_window {
    use super::helpers::line;
    use crate::BestFirstSearch;

    fn solved() -> BestFirstSearch<&'static str> {
        let g = line();
        let mut s = BestFirstSearch::new();
        s.begin_search(&g, "a", "f");
        s.iterate(&g, 100);
        s
    }

    #[test]
    fn long_path_keeps_goal_end() {
        let s = solved();
        let mut buf = [None; 4];
        assert_eq!(s.best_path_into(&mut buf), Some(6));
        assert_eq!(buf, [Some("c"), Some("d"), Some("e"), Some("f")]);
    }

    #[test]
    fn exact_fit() {
        let s = solved();
        let mut buf = [None; 6];
        assert_eq!(s.best_path_into(&mut buf), Some(6));
        assert_eq!(buf[0], Some("a"));
        assert_eq!(buf[5], Some("f"));
    }

    #[test]
    fn short_path_writes_single_terminator() {
        let s = solved();
        let mut buf = [Some("x"); 8];
        assert_eq!(s.best_path_into(&mut buf), Some(6));
        assert_eq!(
            buf,
            [
                Some("a"),
                Some("b"),
                Some("c"),
                Some("d"),
                Some("e"),
                Some("f"),
                None,
                Some("x"),
            ]
        );
    }

    #[test]
    fn empty_buffer_still_reports_length() {
        let s = solved();
        let mut buf: [Option<&str>; 0] = [];
        assert_eq!(s.best_path_into(&mut buf), Some(6));
    }
}

// ── Against the concrete navigation graph ─────────────────────────────────────

#[cfg(test)]
mod nav_graph {
    use nav_core::Vec2;
    use nav_graph::{NavGraph, NavGraphBuilder};

    use crate::{BestFirstSearch, SearchStatus};

    #[test]
    fn astar_around_wall() {
        // 5×3 grid with a wall column at x = 2 except the top row.
        let (g, cells) = NavGraph::grid(5, 3, 1.0, |x, y| x == 2 && y < 2);
        let start = cells[0].unwrap();
        let goal = cells[4].unwrap();

        let mut s = BestFirstSearch::new();
        s.begin_search(&g, start, goal);
        assert_eq!(s.iterate(&g, 1_000), SearchStatus::Solved);

        let path = s.best_path().unwrap();
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        // Up two, across four, down two.
        assert_eq!(path.len(), 9);
        assert!(path.contains(&cells[12].unwrap()), "must cross the gap");
    }

    #[test]
    fn blocked_link_forces_detour() {
        let mut b = NavGraphBuilder::new();
        let n0 = b.add_node(Vec2::new(0.0, 0.0));
        let n1 = b.add_node(Vec2::new(1.0, 1.0));
        let n2 = b.add_node(Vec2::new(1.0, -3.0));
        let n3 = b.add_node(Vec2::new(2.0, 0.0));
        b.add_link(n0, n1);
        b.add_link(n1, n3);
        b.add_link(n0, n2);
        b.add_link(n2, n3);
        let mut g = b.build();

        let mut s = BestFirstSearch::new();
        s.begin_search(&g, n0, n3);
        s.iterate(&g, 100);
        assert_eq!(s.best_path(), Some(vec![n0, n1, n3]));

        g.set_link_blocked(n1, n3, true);
        s.begin_search(&g, n0, n3);
        assert_eq!(s.iterate(&g, 100), SearchStatus::Solved);
        assert_eq!(s.best_path(), Some(vec![n0, n2, n3]));
    }
}
