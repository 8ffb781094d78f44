use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, info};

// Internal module imports
use crate::domain::types::{Coordinates, Node};
use crate::error::{Error, Result};
use crate::setup::init_types::NodeRecord;

/// Load nodes from `path`: a JSON array of records for `.json`, CSV otherwise.
pub fn load_nodes(path: impl AsRef<Path>) -> Result<Vec<Node<Coordinates>>> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let file = BufReader::new(File::open(path)?);
    let nodes = if is_json {
        read_nodes_from_json(file)?
    } else {
        read_nodes_from_csv(file)?
    };

    info!("Loaded {} nodes from {}", nodes.len(), path.display());
    Ok(nodes)
}

/// Reads `id,latitude,longitude` rows. A header is optional: a first row whose
/// id column is not numeric is skipped.
pub fn read_nodes_from_csv<R: Read>(reader: R) -> Result<Vec<Node<Coordinates>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut nodes = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        let record = row?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let first = record.get(0).unwrap_or("");

        if idx == 0 && !first.chars().all(|c| c.is_ascii_digit()) {
            debug!("Skipping CSV header: {:?}", record);
            continue;
        }

        let parsed: NodeRecord = record
            .deserialize(None)
            .map_err(|e| Error::invalid_input(format!("row {}: {e}", idx + 1)))?;
        nodes.push(Node::from(parsed));
    }

    Ok(nodes)
}

pub fn read_nodes_from_json<R: Read>(reader: R) -> Result<Vec<Node<Coordinates>>> {
    let records: Vec<NodeRecord> = serde_json::from_reader(reader)?;
    Ok(records.into_iter().map(Node::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_without_header() {
        let data = "1,16.47,96.10\n2,16.47,94.44\n3,20.09,92.54\n";
        let nodes = read_nodes_from_csv(data.as_bytes()).unwrap();
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[1].id, 2);
        assert_eq!(nodes[1].payload.longitude, 94.44);
    }

    #[test]
    fn test_csv_header_and_whitespace_are_tolerated() {
        let data = "id, latitude, longitude\n 7 , 16.47 , 96.10 \n\n8,20.09,92.54\n";
        let nodes = read_nodes_from_csv(data.as_bytes()).unwrap();
        assert_eq!(nodes.iter().map(|n| n.id).collect::<Vec<_>>(), vec![7, 8]);
        assert_eq!(nodes[0].payload.latitude, 16.47);
    }

    #[test]
    fn test_csv_bad_row_is_invalid_input() {
        let data = "1,16.47,96.10\n2,north,94.44\n";
        let err = read_nodes_from_csv(data.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_csv_row_without_id_is_invalid_input() {
        let data = "1,16.47,96.10\n,16.47,94.44\n3,20.09,92.54\n";
        let err = read_nodes_from_csv(data.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(ref msg) if msg.starts_with("row 2")));
    }

    #[test]
    fn test_csv_whitespace_only_line_is_skipped() {
        let data = "1,16.47,96.10\n   \n2,20.09,92.54\n";
        let nodes = read_nodes_from_csv(data.as_bytes()).unwrap();
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn test_json_records() {
        let data = r#"[{"id": 4, "latitude": 1.5, "longitude": 2.25}]"#;
        let nodes = read_nodes_from_json(data.as_bytes()).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].id, 4);
        assert_eq!(nodes[0].payload.longitude, 2.25);
    }

    #[test]
    fn test_load_nodes_missing_file_is_io_error() {
        let err = load_nodes("definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
