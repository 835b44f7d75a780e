//! Bulk listing import from CSV.
//!
//! Column names are snake_case (`property_type`, `square_footage`, ...).
//! Missing or unparsable cells fall back to fixed defaults:
//!
//! | column | default |
//! |---|---|
//! | `property_type` | `house` |
//! | `price`, `bedrooms`, `bathrooms`, `square_footage`, `lot_size` | `0` |
//! | `location` | `Unknown` |
//! | `year_built` | `2000` |
//! | `description` | `No description available` |
//! | `parking` | `false` unless the cell is exactly `true` |
//! | `status` | `available` |
//!
//! Rows that still fail validation (an unknown property type, a negative
//! price) are skipped and reported rather than aborting the import.

use std::io::Read;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::ports::{ListingPersistenceError, ListingRepository};
use crate::domain::{
    Listing, ListingAttributes, ListingDraft, ListingId, ListingStatus, PropertyType, UserId,
};

const DEFAULT_LOCATION: &str = "Unknown";
const DEFAULT_DESCRIPTION: &str = "No description available";
const DEFAULT_YEAR_BUILT: i32 = 2000;

/// One CSV record. Every cell is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CsvListingRow {
    pub property_type: Option<String>,
    pub price: Option<String>,
    pub location: Option<String>,
    pub bedrooms: Option<String>,
    pub bathrooms: Option<String>,
    pub square_footage: Option<String>,
    pub year_built: Option<String>,
    pub lot_size: Option<String>,
    pub description: Option<String>,
    pub parking: Option<String>,
    pub status: Option<String>,
}

/// Why a row was not imported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowError {
    #[error("unknown property type {0:?}")]
    PropertyType(String),
    #[error("unknown status {0:?}")]
    Status(String),
    #[error("{0}")]
    Invalid(String),
}

/// Failures that abort the whole import.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("malformed CSV at record {record}: {source}")]
    Csv {
        record: usize,
        #[source]
        source: csv::Error,
    },
    #[error("listing store failed: {0}")]
    Store(#[from] ListingPersistenceError),
}

/// Outcome counts for an import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

fn text(cell: Option<&str>) -> Option<&str> {
    cell.map(str::trim).filter(|value| !value.is_empty())
}

fn float_or_zero(cell: Option<&str>) -> f64 {
    text(cell)
        .and_then(|raw| raw.parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Integer cells accept decimals and truncate them, so `2.5` bathrooms is `2`.
fn int_or(cell: Option<&str>, default: i32) -> i32 {
    text(cell)
        .and_then(|raw| {
            raw.parse::<i32>()
                .ok()
                .or_else(|| raw.parse::<f64>().ok().map(|v| v.trunc() as i32))
        })
        .filter(|value| *value != 0)
        .unwrap_or(default)
}

fn lowercase_enum<T: FromStr>(
    cell: Option<&str>,
    default: T,
    error: fn(String) -> RowError,
) -> Result<T, RowError> {
    match text(cell) {
        Some(raw) => {
            let lowered = raw.to_lowercase();
            lowered.parse().map_err(|_| error(lowered))
        }
        None => Ok(default),
    }
}

impl TryFrom<CsvListingRow> for ListingDraft {
    type Error = RowError;

    fn try_from(row: CsvListingRow) -> Result<Self, Self::Error> {
        let property_type = lowercase_enum(
            row.property_type.as_deref(),
            PropertyType::House,
            RowError::PropertyType,
        )?;
        let status = lowercase_enum(
            row.status.as_deref(),
            ListingStatus::Available,
            RowError::Status,
        )?;
        let attributes = ListingAttributes {
            property_type,
            price: float_or_zero(row.price.as_deref()),
            location: text(row.location.as_deref())
                .unwrap_or(DEFAULT_LOCATION)
                .to_owned(),
            bedrooms: int_or(row.bedrooms.as_deref(), 0),
            bathrooms: f64::from(int_or(row.bathrooms.as_deref(), 0)),
            square_footage: int_or(row.square_footage.as_deref(), 0),
            year_built: int_or(row.year_built.as_deref(), DEFAULT_YEAR_BUILT),
            lot_size: f64::from(int_or(row.lot_size.as_deref(), 0)),
            parking: row.parking.as_deref() == Some("true"),
            amenities: Vec::new(),
            description: text(row.description.as_deref())
                .unwrap_or(DEFAULT_DESCRIPTION)
                .to_owned(),
            images: Vec::new(),
        };
        ListingDraft::new(attributes, Some(status)).map_err(|err| RowError::Invalid(err.to_string()))
    }
}

/// Read every record from `input` and store the valid ones as listings owned
/// by `owner`, stamped with `now`.
///
/// # Errors
/// Returns [`ImportError::Csv`] for unreadable records and
/// [`ImportError::Store`] when the repository rejects a listing. Listings
/// stored before the failure stay stored.
pub async fn import_listings<R, L>(
    input: R,
    owner: UserId,
    listings: &L,
    now: DateTime<Utc>,
) -> Result<ImportSummary, ImportError>
where
    R: Read,
    L: ListingRepository + ?Sized,
{
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);
    let mut summary = ImportSummary::default();

    for (index, record) in reader.deserialize::<CsvListingRow>().enumerate() {
        let record_number = index + 1;
        let row = record.map_err(|source| ImportError::Csv {
            record: record_number,
            source,
        })?;
        match ListingDraft::try_from(row) {
            Ok(draft) => {
                let listing = Listing::create(ListingId::random(), owner, draft, now);
                listings.insert(&listing).await?;
                summary.imported += 1;
            }
            Err(error) => {
                warn!(record = record_number, %error, "skipping CSV row");
                summary.skipped += 1;
            }
        }
    }

    info!(
        imported = summary.imported,
        skipped = summary.skipped,
        "CSV import finished"
    );
    Ok(summary)
}
