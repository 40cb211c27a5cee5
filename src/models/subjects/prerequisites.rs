use std::collections::{HashMap, HashSet};

/// 检查把 `subject_id` 的先修课替换为 `proposed` 后是否形成环
///
/// `edges` 为现有的 (课程, 先修课) 关联。返回导致环的先修课 ID。
pub fn find_cycle(subject_id: i64, proposed: &[i64], edges: &[(i64, i64)]) -> Option<i64> {
    let mut graph: HashMap<i64, Vec<i64>> = HashMap::new();
    for (from, to) in edges {
        if *from != subject_id {
            graph.entry(*from).or_default().push(*to);
        }
    }

    for &start in proposed {
        if start == subject_id {
            return Some(start);
        }
        // 从先修课出发能回到自身即为环
        let mut stack = vec![start];
        let mut visited = HashSet::new();
        while let Some(node) = stack.pop() {
            if node == subject_id {
                return Some(start);
            }
            if !visited.insert(node) {
                continue;
            }
            if let Some(next) = graph.get(&node) {
                stack.extend(next.iter().copied());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_reference_is_cycle() {
        assert_eq!(find_cycle(1, &[1], &[]), Some(1));
    }

    #[test]
    fn test_transitive_cycle() {
        // 3 -> 2 -> 1，再让 1 依赖 3
        let edges = [(3, 2), (2, 1)];
        assert_eq!(find_cycle(1, &[3], &edges), Some(3));
        assert_eq!(find_cycle(4, &[3], &edges), None);
    }

    #[test]
    fn test_existing_edges_of_subject_are_replaced() {
        // 1 原先依赖 2，替换后不再考虑旧关联
        let edges = [(1, 2), (3, 4)];
        assert_eq!(find_cycle(1, &[3], &edges), None);
    }

    #[test]
    fn test_non_symmetric() {
        let edges = [(2, 1)];
        assert_eq!(find_cycle(1, &[2], &edges), Some(2));
    }
}
