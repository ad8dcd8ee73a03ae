use crate::ir::{Node, Position};

/// Orders workflow members top-to-bottom by rows, left-to-right within a row.
///
/// A row starts at its topmost member and takes every following member whose y
/// is within `row_tolerance` of that first one, so small pixel jitter between
/// nodes on the same visual row does not reorder them. A member without a
/// position compares equal to everything, so it keeps its input slot and only
/// the positioned members are reordered around it.
pub(super) fn layout_order<'a>(members: &[&'a Node], row_tolerance: f64) -> Vec<&'a Node> {
    let mut placed: Vec<(&'a Node, Position)> = members
        .iter()
        .filter_map(|&node| node.position.map(|pos| (node, pos)))
        .collect();

    placed.sort_by(|a, b| a.1.y.total_cmp(&b.1.y));

    let mut row_start = 0usize;
    while row_start < placed.len() {
        let anchor = placed[row_start].1.y;
        let mut row_end = row_start + 1;
        while row_end < placed.len() && placed[row_end].1.y - anchor <= row_tolerance {
            row_end += 1;
        }
        placed[row_start..row_end].sort_by(|a, b| a.1.x.total_cmp(&b.1.x));
        row_start = row_end;
    }

    let mut banded = placed.into_iter().map(|(node, _)| node);
    members
        .iter()
        .map(|&node| match node.position {
            Some(_) => banded.next().unwrap_or(node),
            None => node,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(nodes: &[&Node]) -> Vec<String> {
        nodes.iter().map(|node| node.id.clone()).collect()
    }

    #[test]
    fn jitter_within_a_row_orders_by_x() {
        let a = Node::new("a").at(300.0, 12.0);
        let b = Node::new("b").at(100.0, 40.0);
        let c = Node::new("c").at(200.0, 0.0);
        let ordered = layout_order(&[&a, &b, &c], 50.0);
        assert_eq!(ids(&ordered), vec!["b", "c", "a"]);
    }

    #[test]
    fn rows_are_ordered_by_y() {
        let low = Node::new("low").at(0.0, 400.0);
        let high = Node::new("high").at(900.0, 0.0);
        let mid = Node::new("mid").at(50.0, 200.0);
        let ordered = layout_order(&[&low, &high, &mid], 50.0);
        assert_eq!(ids(&ordered), vec!["high", "mid", "low"]);
    }

    #[test]
    fn row_is_anchored_at_its_first_member() {
        // 0 and 40 share a row, 80 is more than 50 below the row start.
        let a = Node::new("a").at(500.0, 0.0);
        let b = Node::new("b").at(400.0, 40.0);
        let c = Node::new("c").at(0.0, 80.0);
        let ordered = layout_order(&[&c, &b, &a], 50.0);
        assert_eq!(ids(&ordered), vec!["b", "a", "c"]);
    }

    #[test]
    fn positionless_member_keeps_its_slot() {
        let x = Node::new("x");
        let p = Node::new("p").at(0.0, 0.0);
        let ordered = layout_order(&[&x, &p], 50.0);
        assert_eq!(ids(&ordered), vec!["x", "p"]);
    }

    #[test]
    fn positioned_members_reorder_around_positionless_ones() {
        let x = Node::new("x");
        let b = Node::new("b").at(100.0, 0.0);
        let y = Node::new("y");
        let a = Node::new("a").at(0.0, 10.0);
        let ordered = layout_order(&[&x, &b, &y, &a], 50.0);
        assert_eq!(ids(&ordered), vec!["x", "a", "y", "b"]);
    }
}
