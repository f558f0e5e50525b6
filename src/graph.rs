//! Dependency graph module.
//!
//! Provides the `StatGraph` type, which represents the dependencies between
//! sheet inputs, intermediate values and resolved outputs as a directed
//! acyclic graph (DAG). The resolver evaluates its stages in an order
//! consistent with this graph, and hosts use it to find out which outputs
//! a changed input can touch.

use crate::error::StatError;
use crate::stat_id::{Attribute, CoreStat, DerivedStat};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

/// A value taking part in resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatNode {
    /// Player-assigned attribute maximum (input).
    AttributeMax(Attribute),
    /// Item and coin weight (input).
    CarriedWeight,
    /// Encumbrance of worn armor (input).
    ArmorPenalty,
    /// Remaining hit points (input).
    HitPointValue,
    CarryCapacity,
    Overweight,
    /// `floor((body.max + will.max) / 2)`.
    BaseMax,
    /// `floor((body.current + will.current) / 2)`.
    Base,
    HealthState,
    /// Resolved attribute `current`.
    Attribute(Attribute),
    Core(CoreStat),
    Derived(DerivedStat),
    MeleeBonus,
}

impl fmt::Display for StatNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatNode::AttributeMax(a) => write!(f, "{a}.max"),
            StatNode::CarriedWeight => f.write_str("carriedWeight"),
            StatNode::ArmorPenalty => f.write_str("armorPenalty"),
            StatNode::HitPointValue => f.write_str("hp.value"),
            StatNode::CarryCapacity => f.write_str("carryCapacity"),
            StatNode::Overweight => f.write_str("overweight"),
            StatNode::BaseMax => f.write_str("baseMax"),
            StatNode::Base => f.write_str("base"),
            StatNode::HealthState => f.write_str("healthState"),
            StatNode::Attribute(a) => write!(f, "{a}"),
            StatNode::Core(c) => write!(f, "{c}"),
            StatNode::Derived(d) => write!(f, "{d}"),
            StatNode::MeleeBonus => f.write_str("meleeBonus"),
        }
    }
}

/// A directed acyclic graph (DAG) of stat dependencies.
///
/// If node A depends on node B, then B must be resolved before A.
///
/// # Examples
///
/// ```rust
/// use sheetstat::graph::{StatGraph, StatNode};
/// use sheetstat::CoreStat;
///
/// let mut graph = StatGraph::new();
/// // stun depends on base
/// graph.add_edge(StatNode::Core(CoreStat::Stun), StatNode::Base);
///
/// let order = graph.topological_sort().unwrap();
/// assert_eq!(order, vec![StatNode::Base, StatNode::Core(CoreStat::Stun)]);
/// ```
#[derive(Debug, Clone)]
pub struct StatGraph {
    graph: DiGraph<StatNode, ()>,
    node_map: HashMap<StatNode, NodeIndex>,
}

impl StatGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// The dependency graph of a character sheet.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sheetstat::graph::{StatGraph, StatNode};
    /// use sheetstat::{Attribute, DerivedStat};
    ///
    /// let graph = StatGraph::character_sheet();
    /// let affected = graph.affected_by(StatNode::AttributeMax(Attribute::Will));
    /// assert!(affected.contains(&StatNode::Derived(DerivedStat::Focus)));
    /// ```
    pub fn character_sheet() -> Self {
        use Attribute::{Body, Dex, Int, Ref, Spd, Will};

        let mut graph = StatGraph::new();

        for attribute in Attribute::ALL {
            graph.add_edge(
                StatNode::Attribute(attribute),
                StatNode::AttributeMax(attribute),
            );
            graph.add_edge(StatNode::Attribute(attribute), StatNode::HealthState);
        }

        graph.add_edge(StatNode::CarryCapacity, StatNode::AttributeMax(Body));
        graph.add_edge(StatNode::Overweight, StatNode::CarryCapacity);
        graph.add_edge(StatNode::Overweight, StatNode::CarriedWeight);
        for attribute in [Ref, Dex, Spd] {
            graph.add_edge(StatNode::Attribute(attribute), StatNode::Overweight);
        }
        for attribute in [Ref, Dex] {
            graph.add_edge(StatNode::Attribute(attribute), StatNode::ArmorPenalty);
        }

        graph.add_edge(StatNode::BaseMax, StatNode::AttributeMax(Body));
        graph.add_edge(StatNode::BaseMax, StatNode::AttributeMax(Will));
        graph.add_edge(StatNode::Core(CoreStat::WoundThreshold), StatNode::BaseMax);
        graph.add_edge(StatNode::HealthState, StatNode::HitPointValue);
        graph.add_edge(
            StatNode::HealthState,
            StatNode::Core(CoreStat::WoundThreshold),
        );

        graph.add_edge(StatNode::Base, StatNode::Attribute(Body));
        graph.add_edge(StatNode::Base, StatNode::Attribute(Will));

        for derived in [DerivedStat::Hp, DerivedStat::Sta] {
            graph.add_edge(StatNode::Derived(derived), StatNode::Base);
        }
        // hp.unmodifiedMax
        graph.add_edge(StatNode::Derived(DerivedStat::Hp), StatNode::BaseMax);
        for derived in [DerivedStat::Resolve, DerivedStat::Focus] {
            graph.add_edge(StatNode::Derived(derived), StatNode::Attribute(Will));
            graph.add_edge(StatNode::Derived(derived), StatNode::Attribute(Int));
        }

        for core in [CoreStat::Stun, CoreStat::Rec] {
            graph.add_edge(StatNode::Core(core), StatNode::Base);
            graph.add_edge(StatNode::Core(core), StatNode::BaseMax);
        }
        graph.add_edge(StatNode::Core(CoreStat::Enc), StatNode::Attribute(Body));
        graph.add_edge(StatNode::Core(CoreStat::Run), StatNode::Attribute(Spd));
        graph.add_edge(StatNode::Core(CoreStat::Leap), StatNode::Attribute(Spd));
        graph.add_edge(StatNode::Core(CoreStat::Leap), StatNode::AttributeMax(Spd));
        graph.add_edge(StatNode::MeleeBonus, StatNode::Attribute(Body));

        graph
    }

    /// Add a node to the graph if it doesn't exist.
    ///
    /// Returns the existing index when the node is already present.
    pub fn add_node(&mut self, node: StatNode) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(&node) {
            idx
        } else {
            let idx = self.graph.add_node(node);
            self.node_map.insert(node, idx);
            idx
        }
    }

    /// Add an edge representing a dependency.
    ///
    /// `from` depends on `to` (to must be resolved before from).
    /// Both nodes are added to the graph if they don't exist.
    pub fn add_edge(&mut self, from: StatNode, to: StatNode) {
        let from_idx = self.add_node(from);
        let to_idx = self.add_node(to);
        self.graph.add_edge(to_idx, from_idx, ());
    }

    /// Detect cycles in the graph.
    ///
    /// Uses depth-first search and reports the first cycle found, closed on
    /// the node it started from.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sheetstat::graph::{StatGraph, StatNode};
    ///
    /// let mut graph = StatGraph::new();
    /// graph.add_edge(StatNode::Base, StatNode::BaseMax);
    /// assert!(graph.detect_cycles().is_ok());
    ///
    /// graph.add_edge(StatNode::BaseMax, StatNode::Base);
    /// assert!(graph.detect_cycles().is_err());
    /// ```
    pub fn detect_cycles(&self) -> Result<(), StatError> {
        let mut visited = HashSet::new();
        let mut rec_stack = HashSet::new();

        for node_idx in self.graph.node_indices() {
            if !visited.contains(&node_idx) {
                let mut cycle_path = Vec::new();
                if let Some(cycle) =
                    self.dfs_cycle_detect(node_idx, &mut visited, &mut rec_stack, &mut cycle_path)
                {
                    return Err(cycle);
                }
            }
        }

        Ok(())
    }

    fn dfs_cycle_detect(
        &self,
        node: NodeIndex,
        visited: &mut HashSet<NodeIndex>,
        rec_stack: &mut HashSet<NodeIndex>,
        cycle_path: &mut Vec<StatNode>,
    ) -> Option<StatError> {
        visited.insert(node);
        rec_stack.insert(node);
        cycle_path.push(self.graph[node]);

        for neighbor in self
            .graph
            .neighbors_directed(node, petgraph::Direction::Outgoing)
        {
            if !visited.contains(&neighbor) {
                if let Some(cycle) = self.dfs_cycle_detect(neighbor, visited, rec_stack, cycle_path)
                {
                    return Some(cycle);
                }
            } else if rec_stack.contains(&neighbor) {
                let neighbor_node = self.graph[neighbor];
                let start = cycle_path
                    .iter()
                    .position(|n| *n == neighbor_node)
                    .unwrap_or(0);
                let mut cycle = cycle_path[start..].to_vec();
                cycle.push(neighbor_node);
                return Some(StatError::Cycle { path: cycle });
            }
        }

        rec_stack.remove(&node);
        cycle_path.pop();
        None
    }

    /// Get a topological sort of all nodes, dependencies first.
    pub fn topological_sort(&self) -> Result<Vec<StatNode>, StatError> {
        self.detect_cycles()?;

        match toposort(&self.graph, None) {
            Ok(indices) => Ok(indices.into_iter().map(|idx| self.graph[idx]).collect()),
            Err(cycle) => Err(StatError::Cycle {
                path: vec![self.graph[cycle.node_id()]],
            }),
        }
    }

    /// Every node downstream of `node`, in sorted order.
    ///
    /// Unknown nodes affect nothing.
    pub fn affected_by(&self, node: StatNode) -> Vec<StatNode> {
        let Some(&start) = self.node_map.get(&node) else {
            return Vec::new();
        };

        let mut affected = BTreeSet::new();
        let mut dfs = Dfs::new(&self.graph, start);
        while let Some(idx) = dfs.next(&self.graph) {
            if idx != start {
                affected.insert(self.graph[idx]);
            }
        }
        affected.into_iter().collect()
    }

    /// Get all nodes in the graph.
    pub fn nodes(&self) -> Vec<StatNode> {
        self.graph.node_indices().map(|idx| self.graph[idx]).collect()
    }

    /// Check if a node exists in the graph.
    pub fn contains_node(&self, node: &StatNode) -> bool {
        self.node_map.contains_key(node)
    }
}

impl Default for StatGraph {
    fn default() -> Self {
        Self::new()
    }
}
