//! Graph definition: nodes, edges, and compile-time validation
//!
//! A graph is a fixed, statically declared set of node ids, the handler bound to
//! each, and the edges between them. Build one with [`GraphBuilder`], then
//! [`compile`](GraphBuilder::compile) it into an immutable [`Graph`]. All structural
//! validation happens at compile time - the engine refuses to construct a graph that
//! could fail mid-run for configuration reasons.
//!
//! # Edges
//!
//! - **Direct**: `from -> to`, unconditional.
//! - **Conditional**: `from -> router(&State) -> to`. The router is a pure function
//!   of the merged state at the end of `from`, evaluated exactly once per visit, and
//!   must be total over its declared branches: a router escaping its declaration is
//!   the fatal [`GraphError::UnmappedBranch`] configuration error, never a data error.
//!
//! Each node has exactly one outgoing edge; branching is expressed through the
//! conditional router. The reserved markers [`START`] and [`END`] are virtual - they
//! never execute a handler.
//!
//! # Validation at compile
//!
//! - exactly one entry edge from [`START`]
//! - every edge endpoint and branch target is a declared node (or [`END`])
//! - every declared node has an outgoing edge
//! - [`END`] is reachable from the entry through some path

use crate::error::{GraphError, Result};
use crate::node::NodeHandler;
use crate::state::GraphState;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;

/// Node identifier - unique name for each node in the graph
pub type NodeId = String;

/// Virtual entry marker; an edge from `START` declares the entry node.
pub const START: &str = "__start__";

/// Virtual terminal marker; routing to `END` completes the run.
pub const END: &str = "__end__";

/// Router function for conditional edges: merged state in, next node id out.
pub type Router<S> = Arc<dyn Fn(&S) -> NodeId + Send + Sync>;

/// Outgoing edge of a node.
pub enum Edge<S> {
    /// Unconditional transition to the target node
    Direct(NodeId),

    /// Dynamic routing over a declared set of branch targets
    Conditional {
        /// Pure routing function, evaluated once per visit on the merged state
        router: Router<S>,
        /// Every target the router may legally return
        branches: Vec<NodeId>,
    },
}

impl<S> fmt::Debug for Edge<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::Direct(target) => f.debug_tuple("Direct").field(target).finish(),
            Edge::Conditional { branches, .. } => f
                .debug_struct("Conditional")
                .field("router", &"<function>")
                .field("branches", branches)
                .finish(),
        }
    }
}

impl<S> Edge<S> {
    fn targets(&self) -> Vec<&NodeId> {
        match self {
            Edge::Direct(target) => vec![target],
            Edge::Conditional { branches, .. } => branches.iter().collect(),
        }
    }
}

/// Builder for [`Graph`]. Declare nodes and edges, then call
/// [`compile`](Self::compile).
pub struct GraphBuilder<S: GraphState> {
    nodes: HashMap<NodeId, Arc<dyn NodeHandler<S>>>,
    edges: Vec<(NodeId, Edge<S>)>,
    entries: Vec<NodeId>,
}

impl<S: GraphState> GraphBuilder<S> {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Declare a node and bind its handler.
    pub fn add_node(mut self, id: impl Into<String>, handler: impl NodeHandler<S> + 'static) -> Self {
        self.nodes.insert(id.into(), Arc::new(handler));
        self
    }

    /// Add an unconditional edge. An edge from [`START`] declares the entry node.
    pub fn add_edge(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        let from = from.into();
        let to = to.into();
        if from == START {
            self.entries.push(to);
        } else {
            self.edges.push((from, Edge::Direct(to)));
        }
        self
    }

    /// Add a conditional edge with its declared branch targets.
    pub fn add_conditional_edge<F>(
        mut self,
        from: impl Into<String>,
        router: F,
        branches: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self
    where
        F: Fn(&S) -> NodeId + Send + Sync + 'static,
    {
        self.edges.push((
            from.into(),
            Edge::Conditional {
                router: Arc::new(router),
                branches: branches.into_iter().map(Into::into).collect(),
            },
        ));
        self
    }

    /// Validate the declared structure and produce an immutable [`Graph`].
    pub fn compile(self) -> Result<Graph<S>> {
        let entry = match self.entries.as_slice() {
            [] => {
                return Err(GraphError::InvalidGraph(
                    "no entry edge from __start__".to_string(),
                ))
            }
            [entry] => entry.clone(),
            _ => {
                return Err(GraphError::InvalidGraph(format!(
                    "multiple entry edges from __start__: {:?}",
                    self.entries
                )))
            }
        };

        let mut edges: HashMap<NodeId, Edge<S>> = HashMap::new();
        for (from, edge) in self.edges {
            if !self.nodes.contains_key(&from) {
                return Err(GraphError::InvalidGraph(format!(
                    "edge declared from unknown node '{from}'"
                )));
            }
            if edges.insert(from.clone(), edge).is_some() {
                return Err(GraphError::InvalidGraph(format!(
                    "node '{from}' has more than one outgoing edge"
                )));
            }
        }

        if !self.nodes.contains_key(&entry) {
            return Err(GraphError::InvalidGraph(format!(
                "entry edge targets unknown node '{entry}'"
            )));
        }

        for (from, edge) in &edges {
            for target in edge.targets() {
                if target != END && !self.nodes.contains_key(target) {
                    return Err(GraphError::InvalidGraph(format!(
                        "edge from '{from}' targets unknown node '{target}'"
                    )));
                }
            }
        }

        for id in self.nodes.keys() {
            if !edges.contains_key(id) {
                return Err(GraphError::InvalidGraph(format!(
                    "node '{id}' has no outgoing edge"
                )));
            }
        }

        // END must be reachable through some path from the entry.
        let mut seen: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::from([entry.as_str()]);
        let mut reaches_end = false;
        while let Some(id) = queue.pop_front() {
            if id == END {
                reaches_end = true;
                break;
            }
            if !seen.insert(id) {
                continue;
            }
            if let Some(edge) = edges.get(id) {
                for target in edge.targets() {
                    queue.push_back(target);
                }
            }
        }
        if !reaches_end {
            return Err(GraphError::InvalidGraph(
                "__end__ is not reachable from the entry node".to_string(),
            ));
        }

        Ok(Graph {
            nodes: self.nodes,
            edges,
            entry,
        })
    }
}

impl<S: GraphState> Default for GraphBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Compiled, immutable graph.
pub struct Graph<S: GraphState> {
    nodes: HashMap<NodeId, Arc<dyn NodeHandler<S>>>,
    edges: HashMap<NodeId, Edge<S>>,
    entry: NodeId,
}

impl<S: GraphState> Graph<S> {
    /// The node execution starts from.
    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// Look up the handler bound to a node.
    pub fn handler(&self, node: &str) -> Result<&Arc<dyn NodeHandler<S>>> {
        self.nodes
            .get(node)
            .ok_or_else(|| GraphError::UnknownNode(node.to_string()))
    }

    /// Determine the node after `node`, evaluating a conditional router against
    /// the merged state exactly once.
    pub fn next_node(&self, node: &str, state: &S) -> Result<NodeId> {
        match self.edges.get(node) {
            Some(Edge::Direct(target)) => Ok(target.clone()),
            Some(Edge::Conditional { router, branches }) => {
                let target = router(state);
                if !branches.contains(&target) {
                    return Err(GraphError::UnmappedBranch {
                        node: node.to_string(),
                        target,
                    });
                }
                Ok(target)
            }
            None => Err(GraphError::UnknownNode(node.to_string())),
        }
    }
}

impl<S: GraphState> fmt::Debug for Graph<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut nodes: Vec<&String> = self.nodes.keys().collect();
        nodes.sort();
        f.debug_struct("Graph")
            .field("entry", &self.entry)
            .field("nodes", &nodes)
            .field("edges", &self.edges)
            .finish()
    }
}
