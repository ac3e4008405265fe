//! Bulk provisioning input.
//!
//! Reads a row-per-user CSV into [`UserRequest`]s. Recognized headers come
//! in two spellings each (`username`/`Username`, `first_name`/`FirstName`
//! and so on); anything else is ignored. Field validation stays with the
//! orchestrator so a bad row fails that row, never the whole file.

use std::path::{Path, PathBuf};

use csv::StringRecord;
use thiserror::Error;
use tracing::info;

use warden_core::UserRequest;

/// Role given to every row when the file has no role column at all.
/// An empty cell in a present column is a data error and stays empty.
const DEFAULT_ROLE: &str = "Employee";

#[derive(Debug, Error)]
pub enum IngestError {
    /// The file cannot be opened.
    #[error("cannot read {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A row failed to parse (wrong field count, broken quoting).
    #[error("malformed CSV row: {0}")]
    Row(#[from] csv::Error),
}

/// Column positions resolved from the header row.
#[derive(Debug, Default)]
struct ColumnMap {
    username: Option<usize>,
    email: Option<usize>,
    department: Option<usize>,
    role: Option<usize>,
    first_name: Option<usize>,
    last_name: Option<usize>,
    manager: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Self {
        let mut map = Self::default();
        for (index, header) in headers.iter().enumerate() {
            // Excel exports often prefix the first header with a BOM.
            match header.trim_start_matches('\u{feff}') {
                "username" | "Username" => map.username = Some(index),
                "email" | "Email" => map.email = Some(index),
                "department" | "Department" => map.department = Some(index),
                "role" | "Role" => map.role = Some(index),
                "first_name" | "FirstName" => map.first_name = Some(index),
                "last_name" | "LastName" => map.last_name = Some(index),
                "manager" | "Manager" => map.manager = Some(index),
                _ => {}
            }
        }
        map
    }

    fn field<'a>(record: &'a StringRecord, index: Option<usize>) -> &'a str {
        index.and_then(|i| record.get(i)).unwrap_or("").trim()
    }

    fn request_from(&self, record: &StringRecord) -> UserRequest {
        let manager = Self::field(record, self.manager);
        UserRequest {
            username: Self::field(record, self.username).to_string(),
            email: Self::field(record, self.email).to_string(),
            department: Self::field(record, self.department).to_string(),
            role: match self.role {
                Some(_) => Self::field(record, self.role).to_string(),
                None => DEFAULT_ROLE.to_string(),
            },
            first_name: Self::field(record, self.first_name).to_string(),
            last_name: Self::field(record, self.last_name).to_string(),
            manager: (!manager.is_empty()).then(|| manager.to_string()),
        }
    }
}

/// Read every row of `path` into a [`UserRequest`], in file order.
pub fn read_requests(path: &Path) -> Result<Vec<UserRequest>, IngestError> {
    let mut reader = csv::Reader::from_path(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let headers = reader.headers()?.clone();
    let columns = ColumnMap::from_headers(&headers);

    let mut requests = Vec::new();
    for record in reader.records() {
        let record = record?;
        requests.push(columns.request_from(&record));
    }

    info!(
        path = %path.display(),
        rows = requests.len(),
        "loaded provisioning requests"
    );
    Ok(requests)
}
