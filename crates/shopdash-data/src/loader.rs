//! Delimited-file loader for the order-items table

use crate::record::{OrderRecord, OrderTable};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use shopdash_common::{DashboardError, Result};
use shopdash_config::{ColumnsConfig, DatasetConfig};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reads the order-items file into an [`OrderTable`]
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    path: PathBuf,
    delimiter: u8,
    columns: ColumnsConfig,
}

impl Default for DatasetLoader {
    fn default() -> Self {
        let config = DatasetConfig::default();
        Self {
            path: PathBuf::from(config.path),
            delimiter: b',',
            columns: config.columns,
        }
    }
}

impl DatasetLoader {
    /// Loader for `path` using the default column names and a comma delimiter
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Loader configured from the `dataset` section
    pub fn from_config(config: &DatasetConfig) -> Result<Self> {
        let delimiter = u8::try_from(config.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                DashboardError::validation_field(
                    format!("delimiter '{}' is not an ASCII character", config.delimiter),
                    "dataset.delimiter",
                )
            })?;

        Ok(Self {
            path: PathBuf::from(&config.path),
            delimiter,
            columns: config.columns.clone(),
        })
    }

    /// Set the field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the column names
    pub fn with_columns(mut self, columns: ColumnsConfig) -> Self {
        self.columns = columns;
        self
    }

    /// Path the loader reads from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open and parse the configured file
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<OrderTable> {
        let display = self.path.display().to_string();
        let file = File::open(&self.path)
            .map_err(|e| DashboardError::load_with_source(&display, "cannot open file", e))?;

        let table = self.read(file, &display)?;

        match table.date_bounds() {
            Some(bounds) => info!(rows = table.len(), range = %bounds, "Dataset loaded"),
            None => info!(rows = 0, "Dataset loaded but contains no rows"),
        }

        Ok(table)
    }

    /// Parse an already-open source, e.g. an in-memory buffer
    pub fn load_from_reader<R: Read>(&self, reader: R) -> Result<OrderTable> {
        self.read(reader, "<reader>")
    }

    fn read<R: Read>(&self, reader: R, source_name: &str) -> Result<OrderTable> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| csv_error(e, source_name))?
            .clone();
        let layout = ColumnLayout::resolve(&headers, &self.columns)?;
        debug!(columns = headers.len(), "Header resolved");

        let mut records = Vec::new();
        for (index, row) in csv_reader.records().enumerate() {
            let row = row.map_err(|e| csv_error(e, source_name))?;
            // Header is line 1
            let line = row
                .position()
                .map_or(index + 2, |pos| pos.line() as usize);
            records.push(layout.parse_row(&row, line)?);
        }

        Ok(OrderTable::new(records))
    }
}

/// Field positions of the required columns within a row
#[derive(Debug)]
struct ColumnLayout<'c> {
    names: &'c ColumnsConfig,
    order_id: usize,
    purchase_timestamp: usize,
    price: usize,
    customer_id: usize,
    customer_city: usize,
    seller_id: usize,
    seller_city: usize,
    product_category: usize,
    review_score: usize,
    payment_type: usize,
}

impl<'c> ColumnLayout<'c> {
    fn resolve(headers: &csv::StringRecord, names: &'c ColumnsConfig) -> Result<Self> {
        let positions: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (normalize_header(name), i))
            .collect();

        let find = |name: &str| -> Result<usize> {
            positions
                .get(&normalize_header(name))
                .copied()
                .ok_or_else(|| DashboardError::Parse {
                    message: format!("required column '{name}' is missing from the header"),
                    line: Some(1),
                    column: Some(name.to_string()),
                })
        };

        Ok(Self {
            names,
            order_id: find(&names.order_id)?,
            purchase_timestamp: find(&names.purchase_timestamp)?,
            price: find(&names.price)?,
            customer_id: find(&names.customer_id)?,
            customer_city: find(&names.customer_city)?,
            seller_id: find(&names.seller_id)?,
            seller_city: find(&names.seller_city)?,
            product_category: find(&names.product_category)?,
            review_score: find(&names.review_score)?,
            payment_type: find(&names.payment_type)?,
        })
    }

    fn parse_row(&self, row: &csv::StringRecord, line: usize) -> Result<OrderRecord> {
        let text = |index: usize| optional_text(row.get(index));

        let raw_timestamp = row.get(self.purchase_timestamp).unwrap_or_default();
        let purchased_at = parse_timestamp(raw_timestamp).ok_or_else(|| {
            DashboardError::parse_at(
                format!("cannot parse purchase timestamp '{raw_timestamp}'"),
                line,
                &self.names.purchase_timestamp,
            )
        })?;

        let number = |index: usize, column: &str| -> Result<Option<f64>> {
            parse_number(row.get(index)).map_err(|raw| {
                DashboardError::parse_at(format!("'{raw}' is not a number"), line, column)
            })
        };

        Ok(OrderRecord {
            order_id: text(self.order_id),
            purchased_at,
            price: number(self.price, &self.names.price)?,
            customer_id: text(self.customer_id),
            customer_city: text(self.customer_city),
            seller_id: text(self.seller_id),
            seller_city: text(self.seller_city),
            product_category: text(self.product_category),
            review_score: number(self.review_score, &self.names.review_score)?,
            payment_type: text(self.payment_type),
        })
    }
}

fn csv_error(err: csv::Error, source_name: &str) -> DashboardError {
    if err.is_io_error() {
        return DashboardError::load_with_source(source_name, "read failed", err);
    }

    let message = err.to_string();
    match err.position() {
        Some(pos) => DashboardError::Parse {
            message,
            line: Some(pos.line() as usize),
            column: None,
        },
        None => DashboardError::parse(message),
    }
}

fn normalize_header(name: &str) -> String {
    name.trim_start_matches('\u{feff}').trim().to_lowercase()
}

fn optional_text(field: Option<&str>) -> Option<String> {
    field.filter(|s| !s.is_empty()).map(str::to_string)
}

/// Empty cells and NaN are missing; anything else must parse as a float.
fn parse_number(field: Option<&str>) -> std::result::Result<Option<f64>, String> {
    match field {
        None | Some("") => Ok(None),
        Some(raw) => match raw.parse::<f64>() {
            Ok(value) if value.is_nan() => Ok(None),
            Ok(value) => Ok(Some(value)),
            Err(_) => Err(raw.to_string()),
        },
    }
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopdash_common::test_utils::{create_temp_dir, csv_fixtures, write_fixture};

    #[test]
    fn test_parse_timestamp_forms() {
        let expected = NaiveDate::from_ymd_opt(2017, 10, 2)
            .unwrap()
            .and_hms_opt(10, 56, 33)
            .unwrap();
        assert_eq!(parse_timestamp("2017-10-02 10:56:33"), Some(expected));
        assert_eq!(parse_timestamp("2017-10-02T10:56:33"), Some(expected));
        assert_eq!(parse_timestamp(" 2017-10-02 10:56:33 "), Some(expected));

        let fractional = parse_timestamp("2017-10-02 10:56:33.250").unwrap();
        assert_eq!(fractional.date(), expected.date());

        let midnight = parse_timestamp("2017-10-02").unwrap();
        assert_eq!(midnight.time(), NaiveTime::MIN);

        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("02/10/2017"), None);
        assert_eq!(parse_timestamp("2017-13-02 10:00:00"), None);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(Some("29.99")), Ok(Some(29.99)));
        assert_eq!(parse_number(Some("5")), Ok(Some(5.0)));
        assert_eq!(parse_number(Some("")), Ok(None));
        assert_eq!(parse_number(Some("NaN")), Ok(None));
        assert_eq!(parse_number(None), Ok(None));
        assert_eq!(parse_number(Some("abc")), Err("abc".to_string()));
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("\u{feff}Order_ID "), "order_id");
    }

    #[test]
    fn test_load_three_orders() {
        let table = DatasetLoader::default()
            .load_from_reader(csv_fixtures::three_orders().as_bytes())
            .unwrap();

        assert_eq!(table.len(), 3);
        let first = &table.records()[0];
        assert_eq!(first.order_id.as_deref(), Some("o1"));
        assert_eq!(first.price, Some(10.0));
        assert_eq!(first.customer_city.as_deref(), Some("sao paulo"));
        assert_eq!(first.review_score, Some(5.0));
    }

    #[test]
    fn test_empty_optional_cells_become_none() {
        let table = DatasetLoader::default()
            .load_from_reader(csv_fixtures::mixed_orders().as_bytes())
            .unwrap();

        let o6 = table.iter().find(|r| r.order_id.as_deref() == Some("o6")).unwrap();
        assert_eq!(o6.price, None);
        assert_eq!(o6.product_category, None);
        assert_eq!(o6.review_score, None);
        assert_eq!(o6.payment_type, None);
        assert_eq!(o6.customer_city.as_deref(), Some("rio de janeiro"));
    }

    #[test]
    fn test_missing_column() {
        let data = "order_id,order_purchase_timestamp,price\no1,2017-01-01 00:00:00,1.0\n";
        let err = DatasetLoader::default()
            .load_from_reader(data.as_bytes())
            .unwrap_err();

        match err {
            DashboardError::Parse { line, column, .. } => {
                assert_eq!(line, Some(1));
                assert_eq!(column.as_deref(), Some("customer_id"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_timestamp_reports_line() {
        let data = format!(
            "{}\no1,c1,2017-01-01 09:15:00,10.0,s1,toys,5,credit_card,sao paulo,curitiba\n\
o2,c2,yesterday,20.0,s2,toys,4,boleto,rio de janeiro,curitiba\n",
            csv_fixtures::HEADER
        );
        let err = DatasetLoader::default()
            .load_from_reader(data.as_bytes())
            .unwrap_err();

        match err {
            DashboardError::Parse { line, column, .. } => {
                assert_eq!(line, Some(3));
                assert_eq!(column.as_deref(), Some("order_purchase_timestamp"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_price() {
        let data = format!(
            "{}\no1,c1,2017-01-01 09:15:00,ten,s1,toys,5,credit_card,sao paulo,curitiba\n",
            csv_fixtures::HEADER
        );
        let err = DatasetLoader::default()
            .load_from_reader(data.as_bytes())
            .unwrap_err();
        assert!(err.to_string().contains("line 2, column 'price'"));
    }

    #[test]
    fn test_blank_order_id_is_kept() {
        let data = format!(
            "{}\no1,c1,2017-01-01 09:15:00,10.0,s1,toys,5,credit_card,sao paulo,curitiba\n\
,c2,2017-01-02 10:00:00,20.0,s2,toys,4,boleto,rio de janeiro,curitiba\n",
            csv_fixtures::HEADER
        );
        let table = DatasetLoader::default()
            .load_from_reader(data.as_bytes())
            .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[1].order_id, None);
        assert_eq!(table.records()[1].price, Some(20.0));
    }

    #[test]
    fn test_ragged_row_is_parse_error() {
        let data = format!("{}\no1,c1\n", csv_fixtures::HEADER);
        let err = DatasetLoader::default()
            .load_from_reader(data.as_bytes())
            .unwrap_err();
        assert!(matches!(err, DashboardError::Parse { .. }));
    }

    #[test]
    fn test_custom_delimiter_and_columns() {
        let data = "\u{feff}ID;Bought At;Amount;Buyer;Buyer City;Shop;Shop City;Category;Stars;Paid With\n\
a1;2018-03-01T08:00:00;12,5;c1;recife;s1;natal;toys;4;pix\n";
        let columns = ColumnsConfig {
            order_id: "id".to_string(),
            purchase_timestamp: "Bought At".to_string(),
            price: "amount".to_string(),
            customer_id: "buyer".to_string(),
            customer_city: "buyer city".to_string(),
            seller_id: "shop".to_string(),
            seller_city: "shop city".to_string(),
            product_category: "category".to_string(),
            review_score: "stars".to_string(),
            payment_type: "paid with".to_string(),
        };

        // "12,5" is not a float literal, so the price column must be rejected
        let err = DatasetLoader::default()
            .with_delimiter(b';')
            .with_columns(columns.clone())
            .load_from_reader(data.as_bytes())
            .unwrap_err();
        assert!(matches!(err, DashboardError::Parse { .. }));

        let fixed = data.replace("12,5", "12.5");
        let table = DatasetLoader::default()
            .with_delimiter(b';')
            .with_columns(columns)
            .load_from_reader(fixed.as_bytes())
            .unwrap();
        assert_eq!(table.records()[0].price, Some(12.5));
        assert_eq!(table.records()[0].payment_type.as_deref(), Some("pix"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = create_temp_dir();
        let path = write_fixture(dir.path(), "all_data.csv", &csv_fixtures::mixed_orders());

        let table = DatasetLoader::new(&path).load().unwrap();
        assert_eq!(table.len(), 7);
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let err = DatasetLoader::new("/nonexistent/all_data.csv").load().unwrap_err();
        assert!(matches!(err, DashboardError::Load { .. }));
    }

    #[test]
    fn test_from_config_rejects_wide_delimiter() {
        let config = DatasetConfig {
            delimiter: '§',
            ..DatasetConfig::default()
        };
        assert!(DatasetLoader::from_config(&config).is_err());
    }
}
