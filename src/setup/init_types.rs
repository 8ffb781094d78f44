use serde::Deserialize;

use crate::domain::types::{Coordinates, Node, NodeId};

/// One input row: `id,latitude,longitude`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<NodeRecord> for Node<Coordinates> {
    fn from(record: NodeRecord) -> Self {
        Node::new(
            record.id,
            Coordinates {
                latitude: record.latitude,
                longitude: record.longitude,
            },
        )
    }
}
