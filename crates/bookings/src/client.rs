//! Authenticated requests against the Zoho Bookings JSON API.

use std::sync::Arc;

use {
    chrono::{NaiveDate, NaiveDateTime},
    reqwest::{Client, header::AUTHORIZATION},
    sayvai_config::SayvaiConfig,
    sayvai_oauth::{Result, TokenManager, http::read_json, http_client},
    secrecy::ExposeSecret,
    serde_json::Value,
    tracing::{debug, error, warn},
};

use crate::{
    appointment::{AppointmentAction, NewAppointment, format_date, format_date_time},
    operation::Operation,
};

/// Authorization scheme Zoho expects in front of the access token.
pub const AUTH_SCHEME: &str = "Zoho-oauthtoken";

/// Form or query parameters for one call.
pub type Params = Vec<(String, String)>;

/// Service and staff the booking calls are made against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resources {
    pub service_id: Option<String>,
    pub staff_id: Option<String>,
}

/// Bookings API client. Every call obtains a valid access token first and
/// performs exactly one request against the resource API.
pub struct BookingsClient {
    http: Client,
    base_url: String,
    tokens: Arc<TokenManager>,
    resources: Resources,
}

impl BookingsClient {
    pub fn new(base_url: impl Into<String>, tokens: Arc<TokenManager>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
            resources: Resources::default(),
        }
    }

    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    pub fn with_resources(mut self, resources: Resources) -> Self {
        self.resources = resources;
        self
    }

    pub fn from_config(config: &SayvaiConfig, tokens: Arc<TokenManager>) -> anyhow::Result<Self> {
        Ok(Self::new(&config.zoho.bookings_url, tokens)
            .with_http_client(http_client(&config.http)?)
            .with_resources(Resources {
                service_id: config.zoho.service_id.clone(),
                staff_id: config.zoho.staff_id.clone(),
            }))
    }

    pub fn url(&self, operation: Operation) -> String {
        format!("{}/{}", self.base_url, operation.path())
    }

    /// Issue `operation` with `params` as a form body (mutations) or query
    /// string (reads) and return the decoded JSON body.
    pub async fn call(&self, operation: Operation, params: &[(String, String)]) -> Result<Value> {
        let token = self.tokens.get_valid_access_token().await?;
        let url = self.url(operation);
        debug!(%operation, %url, "bookings request");

        let request = if operation.is_read() {
            self.http.get(&url).query(params)
        } else {
            self.http.post(&url).form(params)
        };

        let response = request
            .header(AUTHORIZATION, format!("{AUTH_SCHEME} {}", token.expose_secret()))
            .send()
            .await
            .inspect_err(|e| error!(%operation, error = %e, "bookings request failed"))?;

        read_json(response)
            .await
            .inspect_err(|e| error!(%operation, error = %e, "bookings request returned an error"))
    }

    /// Book a new appointment.
    pub async fn book(&self, appointment: &NewAppointment) -> Result<Value> {
        let mut params = Params::new();
        push_resource(
            &mut params,
            "service_id",
            appointment.service_id.as_ref().or(self.resources.service_id.as_ref()),
        );
        push_resource(
            &mut params,
            "staff_id",
            appointment.staff_id.as_ref().or(self.resources.staff_id.as_ref()),
        );
        params.push(("from_time".into(), format_date_time(appointment.from_time)));
        if let Some(tz) = &appointment.time_zone {
            params.push(("timezone".into(), tz.clone()));
        }
        if let Some(notes) = &appointment.notes {
            params.push(("notes".into(), notes.clone()));
        }
        // Only the customer object is JSON; the rest stays plain form data.
        params.push((
            "customer_details".into(),
            serde_json::to_string(&appointment.customer)?,
        ));

        self.call(Operation::Book, &params).await
    }

    pub async fn get_appointment(&self, booking_id: &str) -> Result<Value> {
        let params = vec![("booking_id".to_string(), booking_id.to_string())];
        self.call(Operation::Get, &params).await
    }

    pub async fn update_appointment(
        &self,
        booking_id: &str,
        action: AppointmentAction,
    ) -> Result<Value> {
        let params = vec![
            ("booking_id".to_string(), booking_id.to_string()),
            ("action".to_string(), action.as_str().to_string()),
        ];
        self.call(Operation::Update, &params).await
    }

    /// Move a booking to `start_time`, optionally to another staff member.
    pub async fn reschedule(
        &self,
        booking_id: &str,
        start_time: NaiveDateTime,
        staff_id: Option<&str>,
    ) -> Result<Value> {
        let mut params = vec![("booking_id".to_string(), booking_id.to_string())];
        if let Some(staff_id) = staff_id {
            params.push(("staff_id".into(), staff_id.to_string()));
        }
        params.push(("start_time".into(), format_date_time(start_time)));
        self.call(Operation::Reschedule, &params).await
    }

    /// Free slots for the configured service and staff on `date`.
    pub async fn availability(&self, date: NaiveDate) -> Result<Value> {
        let mut params = Params::new();
        push_resource(&mut params, "service_id", self.resources.service_id.as_ref());
        push_resource(&mut params, "staff_id", self.resources.staff_id.as_ref());
        params.push(("selected_date".into(), format_date(date)));
        self.call(Operation::Availability, &params).await
    }
}

fn push_resource(params: &mut Params, key: &str, value: Option<&String>) {
    match value {
        Some(v) => params.push((key.to_string(), v.clone())),
        None => warn!(param = key, "no {key} configured, omitting it from the request"),
    }
}
