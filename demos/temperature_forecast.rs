use chrono::{Days, Utc};
use fmi_timeseries::{FmiClient, LatLon};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = FmiClient::from_env()?;
    let helsinki = LatLon(60.17, 24.94);
    let today = Utc::now().date_naive();
    let end = today.checked_add_days(Days::new(2)).unwrap_or(today);

    let parameters = client
        .available_parameters()
        .location(helsinki)
        .start(today)
        .end(end)
        .call()
        .await?;
    println!("HARMONIE offers {} parameters", parameters.len());

    let harmonie = client
        .temperature_forecast()
        .location(helsinki)
        .start(today)
        .end(end)
        .call()
        .await?
        .frame
        .collect()?;
    println!("HARMONIE daily means:\n{}", harmonie);

    let road = client
        .road_weather_forecast()
        .location(helsinki)
        .start(today)
        .end(end)
        .call()
        .await?
        .frame
        .collect()?;
    println!("Road weather daily means:\n{}", road);

    Ok(())
}
