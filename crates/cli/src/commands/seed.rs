//! Seed the storefront database from a YAML file.
//!
//! # File format
//!
//! ```yaml
//! zip_codes:
//!   - zip: "94103"
//!     city: San Francisco
//!     state: CA
//!     latitude: 37.7725
//!     longitude: -122.4147
//! competitors:
//!   - name: Mission Hardware
//!     address: 1000 Valencia St
//!     zip: "94103"
//! products:
//!   - name: Cast Iron Skillet
//!     base_price: "49.99"
//! ```
//!
//! The whole file is validated against the core types and the table
//! column limits before anything is written, and all rows are inserted in a
//! single transaction.

use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{error, info, warn};

use fairprice_core::{Coordinate, Price, ZipCode};
use fairprice_storefront::db::{
    self, CompetitorRepository, ProductRepository, ZipCodeRepository,
};

use super::database_url;

/// Seed file as written on disk.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedFile {
    #[serde(default)]
    pub zip_codes: Vec<ZipCodeEntry>,
    #[serde(default)]
    pub competitors: Vec<CompetitorEntry>,
    #[serde(default)]
    pub products: Vec<ProductEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZipCodeEntry {
    pub zip: String,
    pub city: String,
    pub state: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompetitorEntry {
    pub name: String,
    pub address: String,
    pub zip: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductEntry {
    pub name: String,
    pub base_price: Decimal,
}

/// Validated seed data, ready to insert.
#[derive(Debug, Default)]
pub struct SeedPlan {
    pub zip_codes: Vec<(ZipCode, String, String, Coordinate)>,
    pub competitors: Vec<(String, String, ZipCode)>,
    pub products: Vec<(String, Price)>,
}

impl SeedFile {
    /// Validate every entry, collecting all problems instead of stopping at the first.
    ///
    /// # Errors
    ///
    /// Returns one message per invalid entry.
    pub fn validate(self) -> Result<SeedPlan, Vec<String>> {
        let mut errors = Vec::new();
        let mut plan = SeedPlan::default();

        for (i, entry) in self.zip_codes.into_iter().enumerate() {
            let mut problems = Vec::new();
            check_len(&mut problems, "city", &entry.city, CITY_MAX_LEN);
            check_len(&mut problems, "state", &entry.state, STATE_MAX_LEN);
            let zip = ZipCode::parse(&entry.zip).map_err(|e| problems.push(e.to_string()));
            let coordinate = Coordinate::new(entry.latitude, entry.longitude)
                .map_err(|e| problems.push(e.to_string()));

            match (zip, coordinate) {
                (Ok(zip), Ok(coordinate)) if problems.is_empty() => {
                    plan.zip_codes
                        .push((zip, entry.city, entry.state, coordinate));
                }
                _ => report(&mut errors, &format!("zip_codes[{i}]"), problems),
            }
        }

        for (i, entry) in self.competitors.into_iter().enumerate() {
            let mut problems = Vec::new();
            check_name(&mut problems, &entry.name);
            check_len(&mut problems, "address", &entry.address, ADDRESS_MAX_LEN);
            let zip = ZipCode::parse(&entry.zip).map_err(|e| problems.push(e.to_string()));

            match zip {
                Ok(zip) if problems.is_empty() => {
                    plan.competitors.push((entry.name, entry.address, zip));
                }
                _ => report(&mut errors, &format!("competitors[{i}]"), problems),
            }
        }

        for (i, entry) in self.products.into_iter().enumerate() {
            let mut problems = Vec::new();
            check_name(&mut problems, &entry.name);
            check_amount(&mut problems, entry.base_price);
            let price = Price::usd(entry.base_price).map_err(|e| problems.push(e.to_string()));

            match price {
                Ok(price) if problems.is_empty() => plan.products.push((entry.name, price)),
                _ => report(&mut errors, &format!("products[{i}]"), problems),
            }
        }

        if errors.is_empty() {
            Ok(plan)
        } else {
            Err(errors)
        }
    }
}

/// Column limits of the storefront schema.
const NAME_MAX_LEN: usize = 200;
const ADDRESS_MAX_LEN: usize = 200;
const CITY_MAX_LEN: usize = 50;
const STATE_MAX_LEN: usize = 3;
/// `NUMERIC(15, 2)`: two fractional digits, below 10^13.
const PRICE_SCALE: u32 = 2;
const PRICE_LIMIT: Decimal = Decimal::from_parts(1_316_134_912, 2_328, 0, false, 0);

fn report(errors: &mut Vec<String>, source: &str, problems: Vec<String>) {
    errors.extend(problems.into_iter().map(|p| format!("{source}: {p}")));
}

fn check_len(problems: &mut Vec<String>, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        problems.push(format!("{field} must be at most {max} characters"));
    }
}

fn check_name(problems: &mut Vec<String>, name: &str) {
    if name.trim().is_empty() {
        problems.push("name cannot be empty".to_string());
    } else {
        check_len(problems, "name", name, NAME_MAX_LEN);
    }
}

fn check_amount(problems: &mut Vec<String>, amount: Decimal) {
    if amount.normalize().scale() > PRICE_SCALE {
        problems.push(format!("price {amount} has more than {PRICE_SCALE} decimal places"));
    }
    if amount.abs() >= PRICE_LIMIT {
        problems.push(format!("price {amount} is too large"));
    }
}

impl SeedPlan {
    /// Competitor zips that this file does not geocode.
    ///
    /// They may already exist in the database, so this is only a warning.
    #[must_use]
    pub fn unmapped_competitor_zips(&self) -> Vec<&ZipCode> {
        let known: HashSet<&ZipCode> = self.zip_codes.iter().map(|(zip, ..)| zip).collect();
        let mut unmapped: Vec<&ZipCode> = self
            .competitors
            .iter()
            .map(|(_, _, zip)| zip)
            .filter(|zip| !known.contains(zip))
            .collect();
        unmapped.sort();
        unmapped.dedup();
        unmapped
    }
}

/// Seed the storefront database from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, any entry is
/// invalid, or a database operation fails.
pub async fn from_file(file_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let database_url = database_url()?;

    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading seed data from file");

    // Read and validate YAML before connecting to database
    let content = tokio::fs::read_to_string(path).await?;
    let seed: SeedFile = serde_yaml::from_str(&content)?;

    let plan = match seed.validate() {
        Ok(plan) => plan,
        Err(errors) => {
            error!("Seed validation failed:");
            for err in &errors {
                error!("  - {err}");
            }
            return Err(format!("{} validation errors found", errors.len()).into());
        }
    };

    for zip in plan.unmapped_competitor_zips() {
        warn!(zip = %zip, "competitor zip is not in this seed file; it must already be geocoded");
    }

    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    // All or nothing: a failed insert rolls back everything before it
    let mut tx = pool.begin().await?;

    for (zip, city, state, coordinate) in &plan.zip_codes {
        ZipCodeRepository::insert(&mut *tx, zip, city, state, *coordinate).await?;
    }

    for (name, address, zip) in &plan.competitors {
        CompetitorRepository::insert(&mut *tx, name, address, zip).await?;
    }

    for (name, price) in &plan.products {
        let product = ProductRepository::insert(&mut *tx, name, *price).await?;
        info!(id = %product.id, name = %product.name, price = %product.base_price, "product created");
    }

    tx.commit().await?;

    info!("Seeding complete!");
    info!("  Zip codes inserted: {}", plan.zip_codes.len());
    info!("  Competitors inserted: {}", plan.competitors.len());
    info!("  Products inserted: {}", plan.products.len());

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
zip_codes:
  - zip: "94103"
    city: San Francisco
    state: CA
    latitude: 37.7725
    longitude: -122.4147
  - zip: "94110"
    city: San Francisco
    state: CA
    latitude: 37.7487
    longitude: -122.4158
competitors:
  - name: Mission Hardware
    address: 1000 Valencia St
    zip: "94110"
  - name: Oakland Outfitters
    address: 12 Broadway
    zip: "94607"
products:
  - name: Cast Iron Skillet
    base_price: "49.99"
  - name: Kettle
    base_price: 20
"#;

    #[test]
    fn test_parse_and_validate_sample() {
        let seed: SeedFile = serde_yaml::from_str(SAMPLE).unwrap();
        let plan = seed.validate().unwrap();

        assert_eq!(plan.zip_codes.len(), 2);
        assert_eq!(plan.competitors.len(), 2);
        assert_eq!(plan.products.len(), 2);
        let prices: Vec<Decimal> = plan.products.iter().map(|(_, p)| p.amount).collect();
        assert_eq!(prices, vec![Decimal::new(4999, 2), Decimal::from(20)]);
    }

    #[test]
    fn test_unmapped_competitor_zips() {
        let seed: SeedFile = serde_yaml::from_str(SAMPLE).unwrap();
        let plan = seed.validate().unwrap();

        let unmapped: Vec<&str> = plan
            .unmapped_competitor_zips()
            .into_iter()
            .map(ZipCode::as_str)
            .collect();
        assert_eq!(unmapped, vec!["94607"]);
    }

    #[test]
    fn test_sections_are_optional() {
        let seed: SeedFile = serde_yaml::from_str("products: []").unwrap();
        let plan = seed.validate().unwrap();
        assert!(plan.zip_codes.is_empty());
        assert!(plan.competitors.is_empty());
    }

    #[test]
    fn test_collects_every_error() {
        let yaml = r#"
zip_codes:
  - zip: ""
    city: Nowhere
    state: NA
    latitude: 95.0
    longitude: 0.0
competitors:
  - name: Bad Zip Co
    address: 1 Main St
    zip: "94;03"
products:
  - name: Negative
    base_price: "-1.00"
  - name: "  "
    base_price: "1.00"
"#;
        let seed: SeedFile = serde_yaml::from_str(yaml).unwrap();
        let errors = seed.validate().unwrap_err();

        let sources: Vec<&str> = errors
            .iter()
            .map(|e| e.split(':').next().unwrap())
            .collect();
        assert_eq!(
            sources,
            vec![
                "zip_codes[0]",
                "zip_codes[0]",
                "competitors[0]",
                "products[0]",
                "products[1]",
            ]
        );
    }

    #[test]
    fn test_rejects_values_that_do_not_fit_the_columns() {
        let yaml = r#"
zip_codes:
  - zip: "94103"
    city: San Francisco
    state: Calif
    latitude: 37.7725
    longitude: -122.4147
products:
  - name: Kettle
    base_price: "19.995"
  - name: Yacht
    base_price: "10000000000000.00"
  - name: Skillet
    base_price: "49.990"
"#;
        let seed: SeedFile = serde_yaml::from_str(yaml).unwrap();
        let errors = seed.validate().unwrap_err();

        assert_eq!(
            errors,
            vec![
                "zip_codes[0]: state must be at most 3 characters",
                "products[0]: price 19.995 has more than 2 decimal places",
                "products[1]: price 10000000000000.00 is too large",
            ]
        );
    }

    #[test]
    fn test_long_names_rejected() {
        let name = "x".repeat(NAME_MAX_LEN + 1);
        let seed = SeedFile {
            competitors: vec![CompetitorEntry {
                name: name.clone(),
                address: "1 Main St".to_string(),
                zip: "94103".to_string(),
            }],
            products: vec![ProductEntry {
                name,
                base_price: Decimal::ONE,
            }],
            ..SeedFile::default()
        };

        let errors = seed.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.ends_with("name must be at most 200 characters")));
    }

    #[test]
    fn test_largest_column_price_accepted() {
        let seed = SeedFile {
            products: vec![ProductEntry {
                name: "Warehouse".to_string(),
                base_price: "9999999999999.99".parse().unwrap(),
            }],
            ..SeedFile::default()
        };

        assert_eq!(seed.validate().unwrap().products.len(), 1);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "products:\n  - name: Kettle\n    base_price: 20\n    sku: K-1\n";
        assert!(serde_yaml::from_str::<SeedFile>(yaml).is_err());
    }
}
