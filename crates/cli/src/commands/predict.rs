//! Prediction commands

use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;
use tabled::Tabled;

use crate::client::{ApiClient, HouseAttributes, Prediction};
use crate::output::{
    color_confidence, format_price, print_heading, print_json, print_table, print_warning, yes_no,
    OutputFormat,
};

/// Starting point for `hpp predict`; individual flags override it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// The 7420 sq ft reference house
    #[default]
    Standard,
    /// Large house with every amenity
    Luxury,
    /// Small house on a main road, no extras
    Budget,
}

impl Preset {
    pub fn attributes(self) -> HouseAttributes {
        match self {
            Preset::Standard => HouseAttributes {
                area: 7420.0,
                bedrooms: 4,
                bathrooms: 1,
                stories: 3,
                mainroad: 1,
                guestroom: 0,
                basement: 0,
                hotwaterheating: 0,
                airconditioning: 1,
                parking: 2,
                prefarea: 1,
                furnishingstatus: 1,
            },
            Preset::Luxury => HouseAttributes {
                area: 12000.0,
                bedrooms: 5,
                bathrooms: 3,
                stories: 2,
                mainroad: 1,
                guestroom: 1,
                basement: 1,
                hotwaterheating: 1,
                airconditioning: 1,
                parking: 4,
                prefarea: 1,
                furnishingstatus: 2,
            },
            Preset::Budget => HouseAttributes {
                area: 3500.0,
                bedrooms: 2,
                bathrooms: 1,
                stories: 1,
                mainroad: 1,
                guestroom: 0,
                basement: 0,
                hotwaterheating: 0,
                airconditioning: 0,
                parking: 1,
                prefarea: 0,
                furnishingstatus: 0,
            },
        }
    }
}

/// Per-attribute flags for `hpp predict`
#[derive(Debug, Clone, Default, Args)]
pub struct AttributeArgs {
    /// Living area in square feet (1000-20000)
    #[arg(long)]
    pub area: Option<f64>,
    /// Number of bedrooms (1-10)
    #[arg(long)]
    pub bedrooms: Option<u8>,
    /// Number of bathrooms (1-10)
    #[arg(long)]
    pub bathrooms: Option<u8>,
    /// Number of stories (1-5)
    #[arg(long)]
    pub stories: Option<u8>,
    /// On a main road (0/1)
    #[arg(long)]
    pub mainroad: Option<u8>,
    /// Has a guest room (0/1)
    #[arg(long)]
    pub guestroom: Option<u8>,
    /// Has a basement (0/1)
    #[arg(long)]
    pub basement: Option<u8>,
    /// Has hot water heating (0/1)
    #[arg(long)]
    pub hotwaterheating: Option<u8>,
    /// Has air conditioning (0/1)
    #[arg(long)]
    pub airconditioning: Option<u8>,
    /// Parking spaces (0-5)
    #[arg(long)]
    pub parking: Option<u8>,
    /// In a preferred area (0/1)
    #[arg(long)]
    pub prefarea: Option<u8>,
    /// 0 = unfurnished, 1 = semi-furnished, 2 = furnished
    #[arg(long)]
    pub furnishingstatus: Option<u8>,
}

impl AttributeArgs {
    /// Apply the given flags on top of `base`
    pub fn apply(&self, base: HouseAttributes) -> HouseAttributes {
        HouseAttributes {
            area: self.area.unwrap_or(base.area),
            bedrooms: self.bedrooms.unwrap_or(base.bedrooms),
            bathrooms: self.bathrooms.unwrap_or(base.bathrooms),
            stories: self.stories.unwrap_or(base.stories),
            mainroad: self.mainroad.unwrap_or(base.mainroad),
            guestroom: self.guestroom.unwrap_or(base.guestroom),
            basement: self.basement.unwrap_or(base.basement),
            hotwaterheating: self.hotwaterheating.unwrap_or(base.hotwaterheating),
            airconditioning: self.airconditioning.unwrap_or(base.airconditioning),
            parking: self.parking.unwrap_or(base.parking),
            prefarea: self.prefarea.unwrap_or(base.prefarea),
            furnishingstatus: self.furnishingstatus.unwrap_or(base.furnishingstatus),
        }
    }
}

#[derive(Tabled)]
struct AttributeRow {
    #[tabled(rename = "Attribute")]
    name: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn furnishing_label(status: u8) -> &'static str {
    match status {
        0 => "unfurnished",
        1 => "semi-furnished",
        2 => "furnished",
        _ => "unknown",
    }
}

fn attribute_rows(house: &HouseAttributes) -> Vec<AttributeRow> {
    vec![
        AttributeRow { name: "Area (sq ft)", value: format!("{:.0}", house.area) },
        AttributeRow { name: "Bedrooms", value: house.bedrooms.to_string() },
        AttributeRow { name: "Bathrooms", value: house.bathrooms.to_string() },
        AttributeRow { name: "Stories", value: house.stories.to_string() },
        AttributeRow { name: "Main road", value: yes_no(house.mainroad).to_string() },
        AttributeRow { name: "Guest room", value: yes_no(house.guestroom).to_string() },
        AttributeRow { name: "Basement", value: yes_no(house.basement).to_string() },
        AttributeRow { name: "Hot water heating", value: yes_no(house.hotwaterheating).to_string() },
        AttributeRow { name: "Air conditioning", value: yes_no(house.airconditioning).to_string() },
        AttributeRow { name: "Parking", value: house.parking.to_string() },
        AttributeRow { name: "Preferred area", value: yes_no(house.prefarea).to_string() },
        AttributeRow {
            name: "Furnishing",
            value: furnishing_label(house.furnishingstatus).to_string(),
        },
    ]
}

fn print_prediction(prediction: &Prediction) {
    print_heading("Price Prediction");
    println!("Price:          {}", prediction.formatted_price.green().bold());
    println!(
        "Per sq ft:      {}",
        format!("${:.2}", prediction.price_per_sqft)
    );
    println!("Confidence:     {}", color_confidence(&prediction.confidence));
    println!("Predicted at:   {}", prediction.prediction_time);
    if prediction.price <= 0.0 {
        print_warning(&format!(
            "Model returned a non-positive price ({})",
            format_price(prediction.price)
        ));
    }
    println!();

    println!("{}", "Features Used".bold());
    print_table(&attribute_rows(&prediction.features_used));
}

/// Predict the price of a house built from a preset and flag overrides
pub async fn predict(
    client: &ApiClient,
    preset: Preset,
    overrides: &AttributeArgs,
    format: OutputFormat,
) -> Result<()> {
    let house = overrides.apply(preset.attributes());
    let prediction = client.predict(&house).await?;

    match format {
        OutputFormat::Json => print_json(&prediction)?,
        OutputFormat::Table => print_prediction(&prediction),
    }

    Ok(())
}

/// Show the server's prediction for its reference house
pub async fn example(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let example = client.example().await?;

    match format {
        OutputFormat::Json => print_json(&example)?,
        OutputFormat::Table => print_prediction(&example.prediction),
    }

    Ok(())
}
