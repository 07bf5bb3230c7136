//! Test utilities shared across the workspace.
//!
//! Enabled for other crates through the `testing` feature.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize logging for tests. Safe to call from every test; only the
/// first call installs a subscriber.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(filter)
            .try_init();
    });
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// Create a temporary directory for tests that automatically cleans up.
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Write `content` to `name` inside `dir` and return the full path.
pub fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).expect("Failed to create fixture file");
    file.write_all(content.as_bytes())
        .expect("Failed to write fixture file");
    path
}

/// Order-items CSV fixtures with the source dataset's column names.
pub mod csv_fixtures {
    /// Header row with every required column, in source order.
    pub const HEADER: &str = "order_id,customer_id,order_purchase_timestamp,price,seller_id,\
product_category_name_english,review_score,payment_type,customer_city,seller_city";

    /// Three orders on two days with prices 10, 20 and 30.
    pub fn three_orders() -> String {
        format!(
            "{HEADER}\n\
o1,c1,2017-01-01 09:15:00,10.0,s1,toys,5,credit_card,sao paulo,curitiba\n\
o2,c2,2017-01-02 10:00:00,20.0,s2,toys,4,boleto,rio de janeiro,curitiba\n\
o3,c3,2017-01-02 23:59:59,30.0,s1,bed_bath_table,3,credit_card,sao paulo,curitiba\n"
        )
    }

    /// A small but realistic extract: multi-item orders, repeated customers,
    /// and missing optional values.
    pub fn mixed_orders() -> String {
        format!(
            "{HEADER}\n\
o1,c1,2017-10-02 10:56:33,29.99,s1,housewares,4,credit_card,sao paulo,maua\n\
o1,c1,2017-10-02 10:56:33,29.99,s1,housewares,4,credit_card,sao paulo,maua\n\
o2,c2,2018-07-24 20:41:37,118.70,s2,perfumery,4,boleto,barreiras,belo horizonte\n\
o3,c3,2018-08-08 08:38:49,159.90,s3,auto,5,credit_card,vianopolis,guariba\n\
o4,c4,2017-11-18 19:28:06,45.00,s4,pet_shop,5,credit_card,sao goncalo do amarante,belo horizonte\n\
o5,c1,2018-02-13 21:18:39,19.90,s5,stationery,5,voucher,sao paulo,mogi das cruzes\n\
o6,c6,2017-11-18 12:01:00,,s2,,,,rio de janeiro,belo horizonte\n"
        )
    }
}
