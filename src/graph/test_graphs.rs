//! Small graph fixtures shared by the unit tests.

use super::models::{AgentAttributes, Edge, GraphModel, Node, NodeData};

fn plain_node(id: &str) -> Node {
    Node {
        id: id.to_string(),
        label: id.to_string(),
        data: NodeData::Agent(AgentAttributes {
            address: String::new(),
            city: String::new(),
            country: String::new(),
            salary: None,
        }),
    }
}

/// Build a graph from explicit node ids and undirected edges.
pub fn from_edges(nodes: &[&str], edges: &[(&str, &str)]) -> GraphModel {
    let mut g = GraphModel::with_capacity(nodes.len(), edges.len());
    for id in nodes {
        g.add_node(plain_node(id));
    }
    for (a, b) in edges {
        g.add_edge(a, b, Edge::default()).unwrap();
    }
    g
}

/// Path p0 - p1 - ... - p(n-1)
pub fn path(n: usize) -> GraphModel {
    let names: Vec<String> = (0..n).map(|i| format!("p{i}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let edges: Vec<(&str, &str)> = refs.windows(2).map(|w| (w[0], w[1])).collect();
    from_edges(&refs, &edges)
}

/// Star: center linked to leaf_0 .. leaf_(n-1)
pub fn star(n_leaves: usize) -> GraphModel {
    let leaves: Vec<String> = (0..n_leaves).map(|i| format!("leaf_{i}")).collect();
    let mut nodes = vec!["center"];
    nodes.extend(leaves.iter().map(String::as_str));
    let edges: Vec<(&str, &str)> = leaves.iter().map(|l| ("center", l.as_str())).collect();
    from_edges(&nodes, &edges)
}

pub fn triangle() -> GraphModel {
    from_edges(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")])
}

/// Complete graph K_n on n0 .. n(n-1)
pub fn complete(n: usize) -> GraphModel {
    let names: Vec<String> = (0..n).map(|i| format!("n{i}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let mut edges = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            edges.push((refs[i], refs[j]));
        }
    }
    from_edges(&refs, &edges)
}

/// Two triangles a1-a2-a3 and b1-b2-b3, inserted b-first.
pub fn disjoint_triangles() -> GraphModel {
    from_edges(
        &["b1", "b2", "b3", "a1", "a2", "a3"],
        &[
            ("b1", "b2"),
            ("b2", "b3"),
            ("b3", "b1"),
            ("a1", "a2"),
            ("a2", "a3"),
            ("a3", "a1"),
        ],
    )
}
