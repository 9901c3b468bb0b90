use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, Float32Array, Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{TreeDataset, TreeRecord};

/// Source column names of the municipal extract. Preparation renames
/// them to the prepared field set and discards everything else.
const COL_ID: &str = "tree_id";
const COL_GENUS: &str = "genus_name";
const COL_SPECIES: &str = "species_name";
const COL_NEIGHBOURHOOD: &str = "neighbourhood_name";
const COL_LATITUDE: &str = "latitude";
const COL_LONGITUDE: &str = "longitude";
const COL_DATE_PLANTED: &str = "date_planted";

// ---------------------------------------------------------------------------
// Raw rows and the preparation step
// ---------------------------------------------------------------------------

/// One unprepared source row. Every field may be null; preparation
/// decides which rows survive.
#[derive(Debug, Clone, Default)]
pub struct RawRecord {
    pub id: Option<u64>,
    pub genus: Option<String>,
    pub species: Option<String>,
    pub neighbourhood: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub date_planted: Option<String>,
}

/// Extract the calendar year from a source date string (`YYYY-…`).
/// Anything unparseable is a null year.
fn planting_year(date: Option<&str>) -> Option<i32> {
    let date = date?.trim();
    let lead: String = date.chars().take_while(|c| c.is_ascii_digit()).collect();
    if lead.len() != 4 {
        return None;
    }
    lead.parse().ok()
}

/// Prepare the raw rows: derive `year`, drop rows with a null year or
/// null coordinates, project to the prepared field set.
///
/// Total over its input; zero usable rows yields an empty table, not an
/// error. Incomplete rows are excluded silently (counted in one log line).
pub fn prepare(raw: Vec<RawRecord>) -> TreeDataset {
    let total = raw.len();
    let records: Vec<TreeRecord> = raw
        .into_iter()
        .filter_map(|r| {
            let year = planting_year(r.date_planted.as_deref())?;
            Some(TreeRecord {
                id: r.id?,
                genus: r.genus.unwrap_or_default(),
                species: r.species.unwrap_or_default(),
                neighbourhood: r.neighbourhood.unwrap_or_default(),
                latitude: r.latitude?,
                longitude: r.longitude?,
                year,
            })
        })
        .collect();

    let dropped = total - records.len();
    if dropped > 0 {
        log::info!("dropped {dropped} of {total} source rows with missing year or coordinates");
    }
    TreeDataset::from_records(records)
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load and prepare the tree dataset from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the municipal source column names
/// * `.json`    – records-oriented array of objects with the same keys
/// * `.parquet` – same columns as scalar Arrow columns
pub fn load_file(path: &Path) -> Result<TreeDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<TreeDataset> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    read_csv(file)
}

/// CSV layout: header row with the source column names; empty cells are
/// null. Split out from [`load_csv`] so tests can feed in-memory data.
pub fn read_csv<R: Read>(reader: R) -> Result<TreeDataset> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let col = |name: &str| headers.iter().position(|h| h == name);
    let id_idx = col(COL_ID).context("CSV missing 'tree_id' column")?;
    let genus_idx = col(COL_GENUS);
    let species_idx = col(COL_SPECIES);
    let hood_idx = col(COL_NEIGHBOURHOOD);
    let lat_idx = col(COL_LATITUDE).context("CSV missing 'latitude' column")?;
    let lon_idx = col(COL_LONGITUDE).context("CSV missing 'longitude' column")?;
    let date_idx = col(COL_DATE_PLANTED).context("CSV missing 'date_planted' column")?;

    let mut raw = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cell = |idx: Option<usize>| -> Option<String> {
            idx.and_then(|i| record.get(i))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        raw.push(RawRecord {
            id: cell(Some(id_idx)).and_then(|s| s.parse().ok()),
            genus: cell(genus_idx),
            species: cell(species_idx),
            neighbourhood: cell(hood_idx),
            latitude: cell(Some(lat_idx)).and_then(|s| s.parse().ok()),
            longitude: cell(Some(lon_idx)).and_then(|s| s.parse().ok()),
            date_planted: cell(Some(date_idx)),
        });
    }

    Ok(prepare(raw))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   {
///     "tree_id": 148,
///     "genus_name": "ACER",
///     "species_name": "RUBRUM",
///     "neighbourhood_name": "KITSILANO",
///     "latitude": 49.2634,
///     "longitude": -123.1556,
///     "date_planted": "1999-03-17"
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<TreeDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut raw = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let string = |key: &str| obj.get(key).and_then(JsonValue::as_str).map(str::to_string);
        let float = |key: &str| obj.get(key).and_then(JsonValue::as_f64);

        raw.push(RawRecord {
            id: obj.get(COL_ID).and_then(JsonValue::as_u64),
            genus: string(COL_GENUS),
            species: string(COL_SPECIES),
            neighbourhood: string(COL_NEIGHBOURHOOD),
            latitude: float(COL_LATITUDE),
            longitude: float(COL_LONGITUDE),
            date_planted: string(COL_DATE_PLANTED),
        });
    }

    Ok(prepare(raw))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of tree records.
///
/// Expected schema: scalar columns named like the CSV header;
/// `tree_id` integer, coordinates Float32/Float64, everything else Utf8
/// (including `date_planted` as a date string).
fn load_parquet(path: &Path) -> Result<TreeDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut raw = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let column = |name: &str| -> Option<&Arc<dyn Array>> {
            schema.index_of(name).ok().map(|i| batch.column(i))
        };
        let id_col = column(COL_ID)
            .with_context(|| format!("Parquet file missing '{COL_ID}' column"))?
            .clone();
        let genus_col = column(COL_GENUS).cloned();
        let species_col = column(COL_SPECIES).cloned();
        let hood_col = column(COL_NEIGHBOURHOOD).cloned();
        let lat_col = column(COL_LATITUDE)
            .with_context(|| format!("Parquet file missing '{COL_LATITUDE}' column"))?
            .clone();
        let lon_col = column(COL_LONGITUDE)
            .with_context(|| format!("Parquet file missing '{COL_LONGITUDE}' column"))?
            .clone();
        let date_col = column(COL_DATE_PLANTED)
            .with_context(|| format!("Parquet file missing '{COL_DATE_PLANTED}' column"))?
            .clone();

        for row in 0..batch.num_rows() {
            raw.push(RawRecord {
                id: extract_u64(&id_col, row),
                genus: genus_col.as_ref().and_then(|c| extract_string(c, row)),
                species: species_col.as_ref().and_then(|c| extract_string(c, row)),
                neighbourhood: hood_col.as_ref().and_then(|c| extract_string(c, row)),
                latitude: extract_f64(&lat_col, row),
                longitude: extract_f64(&lon_col, row),
                date_planted: extract_string(&date_col, row),
            });
        }
    }

    Ok(prepare(raw))
}

// -- Parquet / Arrow scalar helpers --

fn extract_string(col: &Arc<dyn Array>, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|arr| arr.value(row).to_string()),
        _ => None,
    }
}

fn extract_u64(col: &Arc<dyn Array>, row: usize) -> Option<u64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .and_then(|arr| u64::try_from(arr.value(row)).ok()),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .and_then(|arr| u64::try_from(arr.value(row)).ok()),
        _ => None,
    }
}

fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|arr| arr.value(row)),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|arr| arr.value(row) as f64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_year_from_leading_digits() {
        assert_eq!(planting_year(Some("1999-03-17")), Some(1999));
        assert_eq!(planting_year(Some("2014/06/02")), Some(2014));
        assert_eq!(planting_year(Some(" 2020-01-01 ")), Some(2020));
    }

    #[test]
    fn unparseable_date_is_null_year() {
        assert_eq!(planting_year(None), None);
        assert_eq!(planting_year(Some("")), None);
        assert_eq!(planting_year(Some("unknown")), None);
        assert_eq!(planting_year(Some("99-03-17")), None);
    }

    #[test]
    fn prepare_drops_rows_missing_year_or_coordinates() {
        let row = |id, date: Option<&str>, lat: Option<f64>, lon: Option<f64>| RawRecord {
            id: Some(id),
            genus: Some("ACER".to_string()),
            latitude: lat,
            longitude: lon,
            date_planted: date.map(str::to_string),
            ..RawRecord::default()
        };
        let ds = prepare(vec![
            row(1, Some("1999-03-17"), Some(49.25), Some(-123.1)),
            row(2, None, Some(49.25), Some(-123.1)),
            row(3, Some("2001-01-01"), None, Some(-123.1)),
            row(4, Some("2001-01-01"), Some(49.25), None),
        ]);
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records[0].id, 1);
        assert_eq!(ds.records[0].year, 1999);
    }

    #[test]
    fn prepare_of_nothing_is_an_empty_table() {
        assert!(prepare(Vec::new()).is_empty());
    }

    #[test]
    fn reads_csv_with_source_column_names() {
        let csv = "\
tree_id,genus_name,species_name,neighbourhood_name,latitude,longitude,date_planted
148,ACER,RUBRUM,KITSILANO,49.2634,-123.1556,1999-03-17
203,PRUNUS,SERRULATA,DOWNTOWN,49.2820,-123.1171,2005-11-02
311,ACER,,KITSILANO,,-123.1500,2001-05-09
412,QUERCUS,ROBUR,SUNSET,49.2190,-123.0910,
";
        let ds = read_csv(csv.as_bytes()).unwrap();
        // Row 311 has no latitude, row 412 has no planting date.
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].id, 148);
        assert_eq!(ds.records[0].genus, "ACER");
        assert_eq!(ds.records[0].year, 1999);
        assert_eq!(ds.records[1].neighbourhood, "DOWNTOWN");
        assert!(ds.genera.contains("PRUNUS"));
        assert!(!ds.genera.contains("QUERCUS"));
    }

    #[test]
    fn csv_missing_required_column_is_an_error() {
        let csv = "tree_id,genus_name\n1,ACER\n";
        assert!(read_csv(csv.as_bytes()).is_err());
    }
}
