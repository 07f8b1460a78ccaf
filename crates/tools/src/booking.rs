//! Agent tools over the Bookings client.

use std::sync::Arc;

use {
    anyhow::{Context, Result},
    async_trait::async_trait,
    chrono::{NaiveDate, NaiveDateTime},
    sayvai_bookings::{AppointmentAction, BookingsClient, CustomerDetails, NewAppointment},
    serde::{Deserialize, de::DeserializeOwned},
    serde_json::{Value, json},
    tracing::debug,
};

use crate::registry::{AgentTool, ToolRegistry};

/// Register every booking tool against one shared client.
pub fn register_booking_tools(registry: &mut ToolRegistry, client: Arc<BookingsClient>) {
    registry.register(Box::new(CheckAvailabilityTool::new(Arc::clone(&client))));
    registry.register(Box::new(BookAppointmentTool::new(Arc::clone(&client))));
    registry.register(Box::new(GetAppointmentTool::new(Arc::clone(&client))));
    registry.register(Box::new(UpdateAppointmentTool::new(Arc::clone(&client))));
    registry.register(Box::new(RescheduleAppointmentTool::new(client)));
}

fn parse_params<T: DeserializeOwned>(tool: &str, params: Value) -> Result<T> {
    serde_json::from_value(params).with_context(|| format!("invalid parameters for {tool}"))
}

/// `YYYY-MM-DD`
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date `{raw}`, expected YYYY-MM-DD"))
}

/// `YYYY-MM-DD HH:MM`, seconds optional.
pub fn parse_date_time(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M"))
        .with_context(|| format!("invalid date-time `{raw}`, expected YYYY-MM-DD HH:MM"))
}

// ── check_availability ─────────────────────────────────────────────────────

pub struct CheckAvailabilityTool {
    client: Arc<BookingsClient>,
}

impl CheckAvailabilityTool {
    pub fn new(client: Arc<BookingsClient>) -> Self {
        Self { client }
    }
}

#[derive(Deserialize)]
struct AvailabilityParams {
    date: String,
}

#[async_trait]
impl AgentTool for CheckAvailabilityTool {
    fn name(&self) -> &str {
        "check_availability"
    }

    fn description(&self) -> &str {
        "List the free appointment slots on a given date for the configured service and staff member."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "date": {
                    "type": "string",
                    "description": "Day to check, formatted YYYY-MM-DD"
                }
            },
            "required": ["date"]
        })
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let p: AvailabilityParams = parse_params(self.name(), params)?;
        let date = parse_date(&p.date)?;
        debug!(%date, "check_availability");
        Ok(self.client.availability(date).await?)
    }
}

// ── book_appointment ───────────────────────────────────────────────────────

pub struct BookAppointmentTool {
    client: Arc<BookingsClient>,
}

impl BookAppointmentTool {
    pub fn new(client: Arc<BookingsClient>) -> Self {
        Self { client }
    }
}

#[derive(Deserialize)]
struct BookParams {
    start: String,
    name: String,
    email: String,
    phone_number: String,
    #[serde(default)]
    time_zone: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

#[async_trait]
impl AgentTool for BookAppointmentTool {
    fn name(&self) -> &str {
        "book_appointment"
    }

    fn description(&self) -> &str {
        "Book an appointment for a customer. Check availability first; the start time must be a free slot."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "start": {
                    "type": "string",
                    "description": "Start of the appointment, formatted YYYY-MM-DD HH:MM"
                },
                "name": { "type": "string", "description": "Customer name" },
                "email": { "type": "string", "description": "Customer email" },
                "phone_number": { "type": "string", "description": "Customer phone number" },
                "time_zone": {
                    "type": "string",
                    "description": "IANA time zone of the start time, e.g. Asia/Kolkata"
                },
                "notes": { "type": "string", "description": "Free-form notes for the booking" }
            },
            "required": ["start", "name", "email", "phone_number"]
        })
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let p: BookParams = parse_params(self.name(), params)?;
        let mut appointment = NewAppointment::new(parse_date_time(&p.start)?, CustomerDetails {
            name: p.name,
            email: p.email,
            phone_number: p.phone_number,
        });
        appointment.time_zone = p.time_zone;
        appointment.notes = p.notes;

        debug!(from_time = %appointment.from_time, "book_appointment");
        Ok(self.client.book(&appointment).await?)
    }
}

// ── get_appointment ────────────────────────────────────────────────────────

pub struct GetAppointmentTool {
    client: Arc<BookingsClient>,
}

impl GetAppointmentTool {
    pub fn new(client: Arc<BookingsClient>) -> Self {
        Self { client }
    }
}

#[derive(Deserialize)]
struct BookingIdParams {
    booking_id: String,
}

#[async_trait]
impl AgentTool for GetAppointmentTool {
    fn name(&self) -> &str {
        "get_appointment"
    }

    fn description(&self) -> &str {
        "Fetch the details of an existing appointment by booking id."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "booking_id": { "type": "string", "description": "Booking id, e.g. #RE-00123" }
            },
            "required": ["booking_id"]
        })
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let p: BookingIdParams = parse_params(self.name(), params)?;
        Ok(self.client.get_appointment(&p.booking_id).await?)
    }
}

// ── update_appointment ─────────────────────────────────────────────────────

pub struct UpdateAppointmentTool {
    client: Arc<BookingsClient>,
}

impl UpdateAppointmentTool {
    pub fn new(client: Arc<BookingsClient>) -> Self {
        Self { client }
    }
}

#[derive(Deserialize)]
struct UpdateParams {
    booking_id: String,
    action: AppointmentAction,
}

#[async_trait]
impl AgentTool for UpdateAppointmentTool {
    fn name(&self) -> &str {
        "update_appointment"
    }

    fn description(&self) -> &str {
        "Change the status of an appointment: cancel it, or mark it completed or as a no-show."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "booking_id": { "type": "string", "description": "Booking id" },
                "action": {
                    "type": "string",
                    "enum": ["cancel", "completed", "noshow"],
                    "description": "New status for the appointment"
                }
            },
            "required": ["booking_id", "action"]
        })
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let p: UpdateParams = parse_params(self.name(), params)?;
        debug!(booking_id = %p.booking_id, action = %p.action, "update_appointment");
        Ok(self
            .client
            .update_appointment(&p.booking_id, p.action)
            .await?)
    }
}

// ── reschedule_appointment ─────────────────────────────────────────────────

pub struct RescheduleAppointmentTool {
    client: Arc<BookingsClient>,
}

impl RescheduleAppointmentTool {
    pub fn new(client: Arc<BookingsClient>) -> Self {
        Self { client }
    }
}

#[derive(Deserialize)]
struct RescheduleParams {
    booking_id: String,
    start: String,
    #[serde(default)]
    staff_id: Option<String>,
}

#[async_trait]
impl AgentTool for RescheduleAppointmentTool {
    fn name(&self) -> &str {
        "reschedule_appointment"
    }

    fn description(&self) -> &str {
        "Move an existing appointment to a new start time, optionally with a different staff member."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "booking_id": { "type": "string", "description": "Booking id" },
                "start": {
                    "type": "string",
                    "description": "New start time, formatted YYYY-MM-DD HH:MM"
                },
                "staff_id": { "type": "string", "description": "Staff member to move the booking to" }
            },
            "required": ["booking_id", "start"]
        })
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let p: RescheduleParams = parse_params(self.name(), params)?;
        let start = parse_date_time(&p.start)?;
        Ok(self
            .client
            .reschedule(&p.booking_id, start, p.staff_id.as_deref())
            .await?)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        mockito::{Matcher, Server},
        sayvai_bookings::Resources,
        sayvai_oauth::{
            Credential, CredentialStore, MemoryCredentialStore, OAuthConfig, OAuthFlow,
            TokenManager,
        },
        secrecy::Secret,
    };

    fn client(server: &Server) -> Arc<BookingsClient> {
        let flow = OAuthFlow::new(OAuthConfig {
            client_id: "client-1".into(),
            client_secret: Secret::new("secret-1".into()),
            token_url: format!("{}/oauth/v2/token", server.url()),
            redirect_uri: "https://example.test/callback".into(),
            auth_code: None,
        });
        let store = MemoryCredentialStore::new();
        store
            .save(&Credential {
                access_token: Secret::new("A1".into()),
                refresh_token: Secret::new("R".into()),
                expires_at: Some(u64::MAX),
                metadata: serde_json::Map::new(),
            })
            .unwrap();
        let tokens = Arc::new(TokenManager::new(flow, Arc::new(store)));
        Arc::new(
            BookingsClient::new(server.url(), tokens).with_resources(Resources {
                service_id: Some("svc-1".into()),
                staff_id: Some("staff-1".into()),
            }),
        )
    }

    fn registry(server: &Server) -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        register_booking_tools(&mut registry, client(server));
        registry
    }

    #[tokio::test]
    async fn registers_all_booking_tools() {
        let server = Server::new_async().await;
        let registry = registry(&server);
        assert_eq!(registry.names(), vec![
            "book_appointment",
            "check_availability",
            "get_appointment",
            "reschedule_appointment",
            "update_appointment",
        ]);
        for schema in registry.list_schemas() {
            assert_eq!(schema["parameters"]["type"], "object");
            assert!(!schema["description"].as_str().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn check_availability_queries_the_api() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/availableslots")
            .match_query(Matcher::UrlEncoded("selected_date".into(), "30-Apr-2019".into()))
            .with_status(200)
            .with_body(r#"{"response":{"returnvalue":{"data":["10:00"]}}}"#)
            .expect(1)
            .create_async()
            .await;

        let out = registry(&server)
            .execute("check_availability", json!({ "date": "2019-04-30" }))
            .await
            .unwrap();
        assert_eq!(out["response"]["returnvalue"]["data"][0], "10:00");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn invalid_date_fails_without_a_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let err = registry(&server)
            .execute("check_availability", json!({ "date": "30/04/2019" }))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("expected YYYY-MM-DD"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn book_appointment_builds_the_booking() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/appointment")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("from_time".into(), "30-Apr-2019 14:30:00".into()),
                Matcher::UrlEncoded("notes".into(), "first visit".into()),
                Matcher::Regex("customer_details=".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"response":{"status":"success"}}"#)
            .expect(1)
            .create_async()
            .await;

        let out = registry(&server)
            .execute(
                "book_appointment",
                json!({
                    "start": "2019-04-30 14:30",
                    "name": "Ada",
                    "email": "ada@example.test",
                    "phone_number": "+15550100",
                    "notes": "first visit"
                }),
            )
            .await
            .unwrap();
        assert_eq!(out["response"]["status"], "success");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn update_appointment_rejects_unknown_action() {
        let server = Server::new_async().await;
        let err = registry(&server)
            .execute(
                "update_appointment",
                json!({ "booking_id": "#1", "action": "archive" }),
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("invalid parameters for update_appointment"));
    }

    #[tokio::test]
    async fn api_errors_propagate_from_tools() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/getappointment")
            .with_status(404)
            .with_body("not found")
            .create_async()
            .await;

        let err = registry(&server)
            .execute("get_appointment", json!({ "booking_id": "#404" }))
            .await
            .unwrap_err();
        let api_err = err.downcast_ref::<sayvai_oauth::Error>().unwrap();
        assert_eq!(api_err.status().map(|s| s.as_u16()), Some(404));
    }

    #[test]
    fn date_time_parsing_accepts_optional_seconds() {
        assert_eq!(
            parse_date_time("2019-04-30 14:30").unwrap(),
            parse_date_time("2019-04-30 14:30:00").unwrap()
        );
        assert!(parse_date_time("tomorrow at noon").is_err());
    }
}
