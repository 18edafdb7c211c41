//! Weather forecast, in two configurable variants.
//!
//! `ModelKnowledge` asks the model to produce the forecast directly.
//! `ApiDelegated` fetches an Open-Meteo style HTTP API and maps the numeric
//! WMO condition codes onto the site's fixed icon vocabulary through a
//! lookup table. Which variant runs is selected by server configuration.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use ton_content::AiFeature;
use ton_core::{GenerateRequest, Message, Role};
use ton_error::{FlowError, TonResult};
use ton_interface::TextModel;

use crate::extraction::{extract_json, parse_json};
use crate::flags::FeatureGate;

const DEFAULT_API_BASE: &str = "https://api.open-meteo.com/v1";

/// The fixed icon vocabulary the UI can render.
pub const ICON_VOCABULARY: &[&str] = &[
    "sun",
    "partly-cloudy",
    "cloud",
    "fog",
    "drizzle",
    "rain",
    "snow",
    "storm",
];

/// Which forecast strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WeatherVariant {
    /// The model produces the forecast from its own knowledge
    ModelKnowledge,
    /// An external weather API produces the data; icons come from the
    /// condition-code lookup table
    ApiDelegated,
}

/// One day of forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// ISO date (YYYY-MM-DD)
    pub date: String,
    /// Daily minimum, Celsius
    pub temp_min_c: f32,
    /// Daily maximum, Celsius
    pub temp_max_c: f32,
    /// Human-readable condition
    pub condition: String,
    /// Icon name from [`ICON_VOCABULARY`]
    pub icon: String,
}

/// A multi-day forecast for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Display name of the location
    pub location: String,
    /// Per-day entries, today first
    pub days: Vec<ForecastDay>,
}

/// Map a WMO weather condition code onto the icon vocabulary.
pub fn icon_for_condition_code(code: u16) -> &'static str {
    match code {
        0 => "sun",
        1 | 2 => "partly-cloudy",
        3 => "cloud",
        45 | 48 => "fog",
        51..=57 => "drizzle",
        61..=67 | 80..=82 => "rain",
        71..=77 | 85 | 86 => "snow",
        95..=99 => "storm",
        _ => "cloud",
    }
}

fn condition_for_code(code: u16) -> &'static str {
    match code {
        0 => "Clear sky",
        1 | 2 => "Partly cloudy",
        3 => "Overcast",
        45 | 48 => "Fog",
        51..=57 => "Drizzle",
        61..=67 => "Rain",
        71..=77 | 85 | 86 => "Snow",
        80..=82 => "Rain showers",
        95..=99 => "Thunderstorm",
        _ => "Cloudy",
    }
}

#[derive(Debug, Deserialize)]
struct MeteoResponse {
    daily: MeteoDaily,
}

#[derive(Debug, Deserialize)]
struct MeteoDaily {
    time: Vec<String>,
    weathercode: Vec<u16>,
    temperature_2m_max: Vec<f32>,
    temperature_2m_min: Vec<f32>,
}

/// Produces the weather widget's forecast.
pub struct WeatherFlow {
    model: Arc<dyn TextModel>,
    gate: FeatureGate,
    variant: WeatherVariant,
    http: reqwest::Client,
    api_base: String,
}

impl WeatherFlow {
    /// Create the flow with the configured variant.
    pub fn new(model: Arc<dyn TextModel>, gate: FeatureGate, variant: WeatherVariant) -> Self {
        Self {
            model,
            gate,
            variant,
            http: reqwest::Client::new(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Override the weather API base URL.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Fetch a forecast for `location` at the given coordinates.
    #[instrument(skip(self))]
    pub async fn forecast(
        &self,
        location: &str,
        latitude: f64,
        longitude: f64,
    ) -> TonResult<Forecast> {
        let location = location.trim();
        if location.is_empty() {
            return Err(FlowError::validation("location must not be empty").into());
        }
        self.gate.require(AiFeature::WeatherForecast).await?;

        match self.variant {
            WeatherVariant::ModelKnowledge => self.from_model(location).await,
            WeatherVariant::ApiDelegated => self.from_api(location, latitude, longitude).await,
        }
    }

    async fn from_model(&self, location: &str) -> TonResult<Forecast> {
        let prompt = format!(
            "Produce a plausible 3-day weather forecast for {location}, Kenya.\n\n\
             Respond with ONLY valid JSON in this exact shape:\n\
             {{\"days\": [{{\"date\": \"YYYY-MM-DD\", \"temp_min_c\": 14.0, \
             \"temp_max_c\": 26.0, \"condition\": \"short description\", \
             \"icon\": \"one of: {icons}\"}}]}}",
            icons = ICON_VOCABULARY.join(", ")
        );
        let request = GenerateRequest {
            messages: vec![Message::text(Role::User, prompt)],
            max_tokens: Some(1024),
            temperature: Some(0.4),
            model: None,
        };
        let response = self
            .model
            .generate(&request)
            .await
            .map_err(|e| FlowError::upstream(e.to_string()))?;
        let text = response
            .text()
            .ok_or_else(|| FlowError::model_output("empty forecast response"))?;

        #[derive(Deserialize)]
        struct ModelForecast {
            days: Vec<ForecastDay>,
        }
        let out: ModelForecast = parse_json(&extract_json(&text)?)?;
        if out.days.is_empty() {
            return Err(FlowError::model_output("forecast has no days").into());
        }
        let days = out
            .days
            .into_iter()
            .map(|mut day| {
                // Unknown icons collapse to a safe default instead of erroring.
                if !ICON_VOCABULARY.contains(&day.icon.as_str()) {
                    day.icon = "cloud".to_string();
                }
                day
            })
            .collect();
        Ok(Forecast {
            location: location.to_string(),
            days,
        })
    }

    async fn from_api(
        &self,
        location: &str,
        latitude: f64,
        longitude: f64,
    ) -> TonResult<Forecast> {
        let url = format!(
            "{base}/forecast?latitude={latitude}&longitude={longitude}\
             &daily=weathercode,temperature_2m_max,temperature_2m_min\
             &forecast_days=3&timezone=Africa%2FNairobi",
            base = self.api_base,
        );
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| FlowError::upstream(format!("weather API request failed: {e}")))?;
        if !response.status().is_success() {
            return Err(FlowError::upstream(format!(
                "weather API returned {}",
                response.status()
            ))
            .into());
        }
        let body: MeteoResponse = response
            .json()
            .await
            .map_err(|e| FlowError::upstream(format!("weather API payload invalid: {e}")))?;

        let daily = body.daily;
        let days = daily
            .time
            .iter()
            .enumerate()
            .filter_map(|(i, date)| {
                let code = *daily.weathercode.get(i)?;
                Some(ForecastDay {
                    date: date.clone(),
                    temp_min_c: *daily.temperature_2m_min.get(i)?,
                    temp_max_c: *daily.temperature_2m_max.get(i)?,
                    condition: condition_for_code(code).to_string(),
                    icon: icon_for_condition_code(code).to_string(),
                })
            })
            .collect::<Vec<_>>();
        if days.is_empty() {
            return Err(FlowError::upstream("weather API returned no days").into());
        }
        Ok(Forecast {
            location: location.to_string(),
            days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::MockModel;
    use ton_interface::SettingsStore;
    use ton_store::MemoryStore;

    fn gate() -> FeatureGate {
        FeatureGate::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn condition_codes_map_into_the_icon_vocabulary() {
        for code in 0..=99 {
            let icon = icon_for_condition_code(code);
            assert!(ICON_VOCABULARY.contains(&icon), "code {code} -> {icon}");
        }
        assert_eq!(icon_for_condition_code(0), "sun");
        assert_eq!(icon_for_condition_code(63), "rain");
        assert_eq!(icon_for_condition_code(95), "storm");
    }

    #[tokio::test]
    async fn model_variant_normalizes_unknown_icons() {
        let model = Arc::new(MockModel::scripted(&[
            r#"{"days": [{"date": "2026-08-24", "temp_min_c": 13.5, "temp_max_c": 24.0,
                "condition": "Sunny spells", "icon": "sparkles"}]}"#,
        ]));
        let flow = WeatherFlow::new(model, gate(), WeatherVariant::ModelKnowledge);
        let forecast = flow.forecast("Nairobi", -1.29, 36.82).await.unwrap();
        assert_eq!(forecast.days[0].icon, "cloud");
    }

    #[tokio::test]
    async fn disabled_flag_means_zero_calls_in_either_variant() {
        let store = Arc::new(MemoryStore::new());
        store
            .set_ai_flags(&ton_content::PartialAiFlags {
                weather_forecast: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();
        let model = Arc::new(MockModel::scripted(&[r#"{"days": []}"#]));
        let flow = WeatherFlow::new(
            model.clone(),
            FeatureGate::new(store),
            WeatherVariant::ModelKnowledge,
        );
        assert!(flow.forecast("Nairobi", -1.29, 36.82).await.is_err());
        assert_eq!(model.call_count(), 0);
    }

    #[test]
    fn meteo_payload_parses() {
        let body = r#"{
            "daily": {
                "time": ["2026-08-24", "2026-08-25"],
                "weathercode": [0, 61],
                "temperature_2m_max": [25.1, 22.4],
                "temperature_2m_min": [13.0, 12.2]
            }
        }"#;
        let parsed: MeteoResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.daily.time.len(), 2);
        assert_eq!(parsed.daily.weathercode[1], 61);
    }
}
