//! Ticker payload model and parser.

use serde::{Deserialize, Deserializer};

use crate::error::{NumericError, ScrapeError};
use crate::numeric::{parse_float_or_zero, parse_int_or_zero};

/// One raw ticker entry as returned by the API.
///
/// Numbers arrive as JSON strings. Missing and `null` fields are stored
/// as the empty string, which later converts to zero.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CoinRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub symbol: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub rank: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub price_usd: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub price_btc: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub price_eur: String,
    #[serde(
        rename = "24h_volume_usd",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub volume_usd_24h: String,
    #[serde(
        rename = "24h_volume_eur",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub volume_eur_24h: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub market_cap_usd: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub market_cap_eur: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub available_supply: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub total_supply: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub percent_change_1h: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub percent_change_24h: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub percent_change_7d: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub last_updated: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A ticker entry with its numeric fields converted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoinSnapshot {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub rank: i64,
    pub price_usd: f64,
    pub price_btc: f64,
    pub price_eur: f64,
    pub volume_usd_24h: f64,
    pub volume_eur_24h: f64,
    pub market_cap_usd: f64,
    pub market_cap_eur: f64,
    pub available_supply: f64,
    pub total_supply: f64,
    pub percent_change_1h: f64,
    pub percent_change_24h: f64,
    pub percent_change_7d: f64,
    /// Seconds since the Unix epoch.
    pub last_updated: i64,
}

impl CoinRecord {
    /// Convert every numeric-as-text field.
    ///
    /// Fails on the first malformed field, naming it in the error.
    pub fn to_snapshot(&self) -> Result<CoinSnapshot, ScrapeError> {
        let float = |field: &'static str, text: &str| {
            parse_float_or_zero(text).map_err(|source| self.field_error(field, source))
        };
        let int = |field: &'static str, text: &str| {
            parse_int_or_zero(text).map_err(|source| self.field_error(field, source))
        };

        Ok(CoinSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            rank: int("rank", &self.rank)?,
            price_usd: float("price_usd", &self.price_usd)?,
            price_btc: float("price_btc", &self.price_btc)?,
            price_eur: float("price_eur", &self.price_eur)?,
            volume_usd_24h: float("24h_volume_usd", &self.volume_usd_24h)?,
            volume_eur_24h: float("24h_volume_eur", &self.volume_eur_24h)?,
            market_cap_usd: float("market_cap_usd", &self.market_cap_usd)?,
            market_cap_eur: float("market_cap_eur", &self.market_cap_eur)?,
            available_supply: float("available_supply", &self.available_supply)?,
            total_supply: float("total_supply", &self.total_supply)?,
            percent_change_1h: float("percent_change_1h", &self.percent_change_1h)?,
            percent_change_24h: float("percent_change_24h", &self.percent_change_24h)?,
            percent_change_7d: float("percent_change_7d", &self.percent_change_7d)?,
            last_updated: int("last_updated", &self.last_updated)?,
        })
    }

    fn field_error(&self, field: &'static str, source: NumericError) -> ScrapeError {
        ScrapeError::Field {
            coin: self.id.clone(),
            field,
            source,
        }
    }
}

/// Decode a ticker payload: a JSON array of ticker objects.
pub fn parse(json: &str) -> Result<Vec<CoinRecord>, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BITCOIN: &str = r#"{"id":"bitcoin","name":"Bitcoin","symbol":"BTC","rank":"1",
        "price_usd":"5000.5","price_btc":"1","price_eur":"4200.25",
        "24h_volume_usd":"100","24h_volume_eur":"90",
        "market_cap_usd":"1000","market_cap_eur":"900",
        "available_supply":"17000000","total_supply":"21000000",
        "percent_change_1h":"0.5","percent_change_24h":"-1.2","percent_change_7d":"3.3",
        "last_updated":"1600000000"}"#;

    #[test]
    fn test_parse_single_record() {
        let records = parse(&format!("[{BITCOIN}]")).unwrap();
        assert_eq!(records.len(), 1);

        let btc = &records[0];
        assert_eq!(btc.id, "bitcoin");
        assert_eq!(btc.name, "Bitcoin");
        assert_eq!(btc.symbol, "BTC");
        assert_eq!(btc.rank, "1");
        assert_eq!(btc.volume_usd_24h, "100");
        assert_eq!(btc.volume_eur_24h, "90");
        assert_eq!(btc.last_updated, "1600000000");
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(parse("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_preserves_order() {
        let json = r#"[
            {"id":"ethereum","rank":"2"},
            {"id":"bitcoin","rank":"1"},
            {"id":"ripple","rank":"3"}
        ]"#;
        let ids: Vec<_> = parse(json).unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["ethereum", "bitcoin", "ripple"]);
    }

    #[test]
    fn test_parse_null_and_missing_fields() {
        let json = r#"[{"id":"x","name":"X","symbol":"X","total_supply":null}]"#;
        let records = parse(json).unwrap();
        assert_eq!(records[0].total_supply, "");
        assert_eq!(records[0].price_usd, "");
    }

    #[test]
    fn test_parse_ignores_unknown_fields() {
        let json = r#"[{"id":"x","max_supply":"21000000","cached":true}]"#;
        assert_eq!(parse(json).unwrap()[0].id, "x");
    }

    #[test]
    fn test_parse_malformed_json() {
        assert!(parse("not json").is_err());
        assert!(parse("[{\"id\":").is_err());
        assert!(parse("").is_err());
    }

    #[test]
    fn test_parse_wrong_shape() {
        assert!(parse(r#"{"error":"rate limited"}"#).is_err());
        assert!(parse(r#"[{"id":42}]"#).is_err());
        assert!(parse(r#"["bitcoin"]"#).is_err());
    }

    #[test]
    fn test_to_snapshot() {
        let records = parse(&format!("[{BITCOIN}]")).unwrap();
        let snap = records[0].to_snapshot().unwrap();

        assert_eq!(snap.id, "bitcoin");
        assert_eq!(snap.rank, 1);
        assert_eq!(snap.price_usd, 5000.5);
        assert_eq!(snap.price_eur, 4200.25);
        assert_eq!(snap.percent_change_24h, -1.2);
        assert_eq!(snap.available_supply, 17_000_000.0);
        assert_eq!(snap.last_updated, 1_600_000_000);
    }

    #[test]
    fn test_bundled_fixture() {
        let records = parse(include_str!("../test.json")).unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["bitcoin", "ethereum"]);

        let eth = records[1].to_snapshot().unwrap();
        assert_eq!(eth.rank, 2);
        assert_eq!(eth.percent_change_7d, 0.0);
    }

    #[test]
    fn test_to_snapshot_empty_fields_are_zero() {
        let record = CoinRecord {
            id: "x".to_string(),
            ..Default::default()
        };
        let snap = record.to_snapshot().unwrap();
        assert_eq!(snap.rank, 0);
        assert_eq!(snap.price_usd, 0.0);
        assert_eq!(snap.last_updated, 0);
    }

    #[test]
    fn test_to_snapshot_malformed_field() {
        let record = CoinRecord {
            id: "x".to_string(),
            price_usd: "1.0".to_string(),
            market_cap_eur: "lots".to_string(),
            ..Default::default()
        };

        match record.to_snapshot() {
            Err(ScrapeError::Field { coin, field, source }) => {
                assert_eq!(coin, "x");
                assert_eq!(field, "market_cap_eur");
                assert_eq!(source.text, "lots");
            }
            other => panic!("expected field error, got {other:?}"),
        }
    }

    #[test]
    fn test_to_snapshot_fractional_rank_rejected() {
        let record = CoinRecord {
            rank: "1.5".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            record.to_snapshot(),
            Err(ScrapeError::Field { field: "rank", .. })
        ));
    }
}
