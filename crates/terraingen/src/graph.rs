use crate::constants::{COMMUNITY_COLORS, EPSILON};
use crate::error::{Result, TerrainError};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// A community as seen by the terrain: a blob of nodes collapsed to one point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityNode {
    pub id: u32,
    /// Layout position inside `[-1, 1]²`
    pub position: Vec2,
    pub size: f32,
    #[serde(default = "default_color")]
    pub color: [f32; 4],
}

/// Undirected, weighted connection between two communities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityLink {
    pub source: u32,
    pub target: u32,
    pub weight: f32,
}

fn default_color() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

/// On-disk shape of a graph file (`[[nodes]]` and `[[links]]` tables)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphFile {
    #[serde(default)]
    pub nodes: Vec<CommunityNode>,
    #[serde(default)]
    pub links: Vec<CommunityLink>,
}

/// Validated community graph.
///
/// Nodes keep their insertion order, which is also the compositing order of the
/// node-color raster.
#[derive(Debug, Clone)]
pub struct CommunityGraph {
    nodes: Vec<CommunityNode>,
    links: Vec<CommunityLink>,
    index: HashMap<u32, usize>,
    linked: HashSet<u32>,
}

impl CommunityGraph {
    pub fn new(nodes: Vec<CommunityNode>, links: Vec<CommunityLink>) -> Result<Self> {
        let mut index = HashMap::with_capacity(nodes.len());

        for (i, node) in nodes.iter().enumerate() {
            validate_node(node)?;
            if index.insert(node.id, i).is_some() {
                return Err(TerrainError::InvalidNode {
                    id: node.id,
                    reason: "duplicate id".to_string(),
                });
            }
        }

        let mut linked = HashSet::new();
        for link in &links {
            validate_link(link, &index)?;
            linked.insert(link.source);
            linked.insert(link.target);
        }

        Ok(Self {
            nodes,
            links,
            index,
            linked,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: GraphFile = toml::from_str(content)?;
        Self::new(file.nodes, file.links)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn nodes(&self) -> &[CommunityNode] {
        &self.nodes
    }

    pub fn links(&self) -> &[CommunityLink] {
        &self.links
    }

    pub fn node(&self, id: u32) -> Option<&CommunityNode> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    /// Both ends of a link. Links are validated on construction, so this only
    /// fails for a link that does not belong to this graph.
    pub fn endpoints(&self, link: &CommunityLink) -> Option<(&CommunityNode, &CommunityNode)> {
        Some((self.node(link.source)?, self.node(link.target)?))
    }

    pub fn is_isolated(&self, id: u32) -> bool {
        !self.linked.contains(&id)
    }

    /// Nodes without any incident link, in insertion order
    pub fn isolated_nodes(&self) -> impl Iterator<Item = &CommunityNode> {
        self.nodes.iter().filter(|node| self.is_isolated(node.id))
    }

    pub fn min_node_size(&self) -> Option<f32> {
        self.nodes.iter().map(|n| n.size).reduce(f32::min)
    }
}

// Slack for layouts that land a hair outside the field after rescaling
const POSITION_TOLERANCE: f32 = 1e-4;

fn validate_node(node: &CommunityNode) -> Result<()> {
    let reason = if !node.size.is_finite() || node.size <= 0.0 {
        Some(format!("size must be > 0, got {}", node.size))
    } else if !node.position.is_finite() {
        Some("position must be finite".to_string())
    } else if node.position.abs().max_element() > 1.0 + POSITION_TOLERANCE {
        Some(format!("position must lie in [-1, 1]², got {}", node.position))
    } else if node.color.iter().any(|c| !c.is_finite()) {
        Some("color must be finite".to_string())
    } else {
        None
    };

    match reason {
        Some(reason) => Err(TerrainError::InvalidNode { id: node.id, reason }),
        None => Ok(()),
    }
}

fn validate_link(link: &CommunityLink, index: &HashMap<u32, usize>) -> Result<()> {
    for id in [link.source, link.target] {
        if !index.contains_key(&id) {
            return Err(TerrainError::UnknownNode(id));
        }
    }

    let reason = if link.source == link.target {
        Some("self-links are not allowed".to_string())
    } else if !link.weight.is_finite() || link.weight < 0.0 {
        Some(format!("weight must be >= 0, got {}", link.weight))
    } else {
        None
    };

    match reason {
        Some(reason) => Err(TerrainError::InvalidLink {
            source_id: link.source,
            target_id: link.target,
            reason,
        }),
        None => Ok(()),
    }
}

/// Rescales layout coordinates into the square inscribed in the unit disc.
///
/// Each axis is mapped independently from its bounding range; `padding` shrinks
/// the target square further (in `[0, 1]` texture units). An axis without extent
/// collapses to the centre.
pub fn normalize_into_disc(points: &mut [Vec2], padding: f32) {
    let Some(min) = points.iter().copied().reduce(Vec2::min) else {
        return;
    };
    let Some(max) = points.iter().copied().reduce(Vec2::max) else {
        return;
    };

    let low = (2.0 - std::f32::consts::SQRT_2) / 4.0 + padding;
    let high = 1.0 - low;
    let span = max - min;

    for point in points.iter_mut() {
        let rx = if span.x > EPSILON { (point.x - min.x) / span.x } else { 0.5 };
        let ry = if span.y > EPSILON { (point.y - min.y) / span.y } else { 0.5 };
        let unit = Vec2::new(low + (high - low) * rx, low + (high - low) * ry);
        *point = unit * 2.0 - Vec2::ONE;
    }
}

/// Seeded random community graph for demos and tests
pub fn random_graph(seed: u64, communities: usize, link_probability: f64) -> Result<CommunityGraph> {
    let mut rng = StdRng::seed_from_u64(seed);
    let link_probability = link_probability.clamp(0.0, 1.0);

    let mut positions: Vec<Vec2> = (0..communities)
        .map(|_| Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0)))
        .collect();
    normalize_into_disc(&mut positions, 0.05);

    let nodes: Vec<CommunityNode> = positions
        .into_iter()
        .enumerate()
        .map(|(i, position)| CommunityNode {
            id: i as u32,
            position,
            size: rng.random_range(1..=20) as f32,
            color: COMMUNITY_COLORS[i % COMMUNITY_COLORS.len()],
        })
        .collect();

    let mut links = Vec::new();
    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            if rng.random_bool(link_probability) {
                let max_links = nodes[i].size * nodes[j].size;
                links.push(CommunityLink {
                    source: nodes[i].id,
                    target: nodes[j].id,
                    weight: rng.random_range(0.0..=max_links).round(),
                });
            }
        }
    }

    CommunityGraph::new(nodes, links)
}
