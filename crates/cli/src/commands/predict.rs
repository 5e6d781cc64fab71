//! Price prediction command

use anyhow::Result;

use crate::client::{ApiClient, CarFeatures};
use crate::output::{print_json, print_success, render_table, FieldRow, OutputFormat};

/// Request a price estimate for one car
pub async fn predict_price(
    client: &ApiClient,
    car: &CarFeatures,
    format: OutputFormat,
) -> Result<()> {
    let result = client.predict(car).await?;

    match format {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Table => {
            let rows = vec![
                FieldRow::new("Car", format!("{} {} ({})", car.brand, car.model, car.year)),
                FieldRow::new("Engine", format!("{:.1} L {}", car.engine_size, car.fuel_type)),
                FieldRow::new("Transmission", car.transmission.clone()),
                FieldRow::new("Mileage", car.mileage.to_string()),
                FieldRow::new("Body", format!("{} / {}", car.car_type, car.drive_type)),
                FieldRow::new("Estimate", result.formatted_price.clone()),
                FieldRow::new("Currency", result.currency.clone()),
            ];
            println!("{}", render_table(rows));
            print_success(&format!("Estimated price: {}", result.formatted_price));
        }
    }

    Ok(())
}
