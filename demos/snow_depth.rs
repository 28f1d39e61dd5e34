use chrono::NaiveDate;
use fmi_timeseries::{BoundingBox, FmiClient};
use polars::prelude::{col, lit};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    configure_polars_display();
    let client = FmiClient::from_env()?;
    let helsinki_area = BoundingBox::new(24.5, 60.1, 25.3, 60.4);

    let snow = client
        .snow_depth()
        .bbox(helsinki_area)
        .start(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap())
        .end(NaiveDate::from_ymd_opt(2025, 2, 7).unwrap())
        .call()
        .await?;

    let deep_snow = snow
        .within(helsinki_area)
        .filter(col("snow_water_equivalent").gt(lit(50.0f64)))
        .frame
        .collect()?;

    println!("{:#?}", deep_snow);

    Ok(())
}

fn configure_polars_display() {
    env::set_var("POLARS_FMT_MAX_COLS", "-1");
    env::set_var("POLARS_FMT_MAX_ROWS", "20");
}
