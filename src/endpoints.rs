//! One method per documented endpoint. Each only assembles a path and its
//! query parameters and hands them to [`Client::get`].

use crate::client::{Client, Params, PING_PATH, SEGMENT_ENCODE_SET};
use crate::error::Result;
use crate::response::{CanonicalResult, RawBody};
use percent_encoding::utf8_percent_encode;

/// Time window and filters for the date-ranged collection endpoints.
///
/// Timestamps are sent as given, e.g. `2024-03-01 00:00:00`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: String,
    pub end: String,
    pub limit: Option<u32>,
    pub customer: Option<String>,
    pub include_void_invoices: bool,
}

impl DateRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            limit: None,
            customer: None,
            include_void_invoices: true,
        }
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Narrows facility-wide queries to one customer.
    pub fn customer(mut self, customer_id: impl Into<String>) -> Self {
        self.customer = Some(customer_id.into());
        self
    }

    pub fn include_void_invoices(mut self, include: bool) -> Self {
        self.include_void_invoices = include;
        self
    }

    fn base_params(&self) -> Params {
        Params::new()
            .with("startDateTime", &self.start)
            .with("endDateTime", &self.end)
            .with_opt("limit", self.limit)
    }

    fn with_void_invoices(&self, params: Params) -> Params {
        params.with("includeVoidInvoices", self.include_void_invoices)
    }

    fn with_customer(&self, params: Params) -> Params {
        params.with_opt("customer", self.customer.as_deref())
    }
}

/// Which facilities a settings or versions lookup covers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FacilityScope {
    #[default]
    All,
    /// Uses the facility-scoped path.
    One(String),
    /// Sent as a single comma-joined `facility` filter. An empty list
    /// behaves like `All`.
    Many(Vec<String>),
}

impl FacilityScope {
    fn resolve(&self, collection: &str, params: Params) -> (String, Params) {
        match self {
            FacilityScope::All => (format!("/{}", collection), params),
            FacilityScope::Many(codes) if codes.is_empty() => (format!("/{}", collection), params),
            FacilityScope::One(code) => (
                format!("/{}/facility/{}", collection, segment(code)),
                params,
            ),
            FacilityScope::Many(codes) => (
                format!("/{}", collection),
                params.with("facility", codes.clone()),
            ),
        }
    }
}

impl From<&str> for FacilityScope {
    fn from(code: &str) -> Self {
        FacilityScope::One(code.to_string())
    }
}

impl From<Vec<String>> for FacilityScope {
    fn from(codes: Vec<String>) -> Self {
        FacilityScope::Many(codes)
    }
}

fn segment(value: &str) -> String {
    utf8_percent_encode(value, SEGMENT_ENCODE_SET).to_string()
}

impl Client {
    async fn get_canonical(&self, path: &str, params: Option<&Params>) -> Result<CanonicalResult> {
        self.get(path, params).await?.into_canonical()
    }

    // Bookings

    pub async fn get_customer_bookings(&self, customer_id: &str, range: &DateRange) -> Result<CanonicalResult> {
        let path = format!("/bookings/customer/{}", segment(customer_id));
        self.get_canonical(&path, Some(&range.base_params())).await
    }

    pub async fn get_facility_bookings(&self, facility_code: &str, range: &DateRange) -> Result<CanonicalResult> {
        let path = format!("/bookings/facility/{}", segment(facility_code));
        let params = range.with_customer(range.with_void_invoices(range.base_params()));
        self.get_canonical(&path, Some(&params)).await
    }

    pub async fn get_booking(&self, facility_code: &str, booking_id: &str) -> Result<CanonicalResult> {
        let path = format!(
            "/bookings/facility/{}/{}",
            segment(facility_code),
            segment(booking_id)
        );
        self.get_canonical(&path, None).await
    }

    // Check-ins

    pub async fn get_customer_checkins(&self, customer_id: &str, range: &DateRange) -> Result<CanonicalResult> {
        let path = format!("/checkins/customer/{}", segment(customer_id));
        self.get_canonical(&path, Some(&range.base_params())).await
    }

    pub async fn get_facility_checkins(&self, facility_code: &str, range: &DateRange) -> Result<CanonicalResult> {
        let path = format!("/checkins/facility/{}", segment(facility_code));
        let params = range.with_customer(range.base_params());
        self.get_canonical(&path, Some(&params)).await
    }

    pub async fn get_checkin(&self, facility_code: &str, checkin_id: &str) -> Result<CanonicalResult> {
        let path = format!(
            "/checkins/facility/{}/{}",
            segment(facility_code),
            segment(checkin_id)
        );
        self.get_canonical(&path, None).await
    }

    // Customers, debug, facilities

    pub async fn get_customer(&self, customer_id: &str) -> Result<CanonicalResult> {
        let path = format!("/customers/{}", segment(customer_id));
        self.get_canonical(&path, None).await
    }

    pub async fn get_debug(&self, request_id: &str) -> Result<CanonicalResult> {
        let path = format!("/debug/{}", segment(request_id));
        self.get_canonical(&path, None).await
    }

    pub async fn get_facilities(&self) -> Result<CanonicalResult> {
        self.get_canonical("/facilities", None).await
    }

    // Invoices

    pub async fn get_customer_invoices(&self, customer_id: &str, range: &DateRange) -> Result<CanonicalResult> {
        let path = format!("/invoices/customer/{}", segment(customer_id));
        let params = range.with_void_invoices(range.base_params());
        self.get_canonical(&path, Some(&params)).await
    }

    pub async fn get_facility_invoices(&self, facility_code: &str, range: &DateRange) -> Result<CanonicalResult> {
        let path = format!("/invoices/facility/{}", segment(facility_code));
        let params = range.with_customer(range.with_void_invoices(range.base_params()));
        self.get_canonical(&path, Some(&params)).await
    }

    pub async fn get_invoice(&self, facility_code: &str, invoice_id: &str) -> Result<CanonicalResult> {
        let path = format!(
            "/invoices/facility/{}/{}",
            segment(facility_code),
            segment(invoice_id)
        );
        self.get_canonical(&path, None).await
    }

    // Ping and token info

    /// The raw `/ping` body, normally `pong`.
    pub async fn ping(&self) -> Result<String> {
        match self.get_raw(PING_PATH, None).await? {
            RawBody::Text(text) => Ok(text),
            RawBody::Json(value) => Ok(value.to_string()),
        }
    }

    /// Details about the credentials in use.
    pub async fn get_auth_token_info(&self) -> Result<CanonicalResult> {
        self.get_canonical("/me", None).await
    }

    // Settings and versions

    pub async fn get_setting(&self, name: &str, scope: &FacilityScope) -> Result<CanonicalResult> {
        let (path, params) = scope.resolve("settings", Params::new().with("name", name));
        self.get_canonical(&path, Some(&params)).await
    }

    /// The last-run software version per facility.
    pub async fn get_version(&self, scope: &FacilityScope) -> Result<CanonicalResult> {
        let (path, params) = scope.resolve("versions", Params::new());
        self.get_canonical(&path, Some(&params)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ParamValue;

    #[test]
    fn test_date_range_params() {
        let range = DateRange::new("2024-03-01 00:00:00", "2024-03-01 23:59:59").limit(50);
        let params = range.with_customer(range.with_void_invoices(range.base_params()));

        assert_eq!(params.get("limit"), Some(&ParamValue::Integer(50)));
        assert_eq!(params.get("includeVoidInvoices"), Some(&ParamValue::Bool(true)));
        assert_eq!(params.get("customer"), None);
        assert_eq!(
            params.encode().as_deref(),
            Some("startDateTime=2024-03-01%2000%3A00%3A00&endDateTime=2024-03-01%2023%3A59%3A59&limit=50&includeVoidInvoices=1")
        );
    }

    #[test]
    fn test_date_range_without_limit() {
        let range = DateRange::new("a", "b").customer("C 9").include_void_invoices(false);
        let params = range.with_customer(range.with_void_invoices(range.base_params()));
        assert_eq!(
            params.encode().as_deref(),
            Some("startDateTime=a&endDateTime=b&includeVoidInvoices=0&customer=C%209")
        );
    }

    #[test]
    fn test_facility_scope_paths() {
        let (path, params) = FacilityScope::All.resolve("versions", Params::new());
        assert_eq!(path, "/versions");
        assert_eq!(params.encode(), None);

        let (path, params) = FacilityScope::from("AAA").resolve("versions", Params::new());
        assert_eq!(path, "/versions/facility/AAA");
        assert_eq!(params.encode(), None);

        let scope = FacilityScope::from(vec!["AAA".to_string(), "BBB".to_string()]);
        let (path, params) = scope.resolve("settings", Params::new().with("name", "timezone"));
        assert_eq!(path, "/settings");
        assert_eq!(params.encode().as_deref(), Some("name=timezone&facility=AAA%2CBBB"));
    }

    #[test]
    fn test_empty_facility_list_is_unfiltered() {
        let (path, params) = FacilityScope::Many(Vec::new()).resolve("versions", Params::new());
        assert_eq!(path, "/versions");
        assert_eq!(params.encode(), None);

        let (path, params) =
            FacilityScope::Many(Vec::new()).resolve("settings", Params::new().with("name", "tz"));
        assert_eq!(path, "/settings");
        assert_eq!(params.encode().as_deref(), Some("name=tz"));
    }

    #[test]
    fn test_segments_are_escaped() {
        assert_eq!(segment("AB C/1"), "AB%20C%2F1");
        assert_eq!(segment("plain-id_1"), "plain-id_1");
    }
}
