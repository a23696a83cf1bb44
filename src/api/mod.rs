mod error;

use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

pub use error::ApiError;

use crate::core::{
    MAX_HORIZON_DAYS, MilestoneResult, MonthlyRecord, ProfitSummary, SimulationParams,
    average_profits, compound_interest, effective_rate, milestones, monthly_plan,
};
use crate::format::{Language, format_number, format_time_period};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliLanguage {
    En,
    Ru,
}

impl From<CliLanguage> for Language {
    fn from(value: CliLanguage) -> Self {
        match value {
            CliLanguage::En => Language::En,
            CliLanguage::Ru => Language::Ru,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ApiLanguage {
    #[serde(alias = "english")]
    En,
    #[serde(alias = "russian")]
    Ru,
}

impl From<ApiLanguage> for CliLanguage {
    fn from(value: ApiLanguage) -> Self {
        match value {
            ApiLanguage::En => CliLanguage::En,
            ApiLanguage::Ru => CliLanguage::Ru,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CalculatePayload {
    principal: Option<f64>,
    rate: Option<f64>,
    compounding_days: Option<u32>,
    term_days: Option<u32>,
    additional_amount: Option<f64>,
    additional_frequency: Option<u32>,
    target_income: Option<f64>,
    lang: Option<ApiLanguage>,
}

#[derive(Args, Debug, Clone)]
pub struct CalcArgs {
    #[arg(long, default_value_t = 10_000.0, help = "Initial balance")]
    pub principal: f64,
    #[arg(
        long,
        default_value_t = 8.0,
        allow_negative_numbers = true,
        help = "Nominal annual interest rate in percent, e.g. 8"
    )]
    pub rate: f64,
    #[arg(
        long,
        default_value_t = 30,
        help = "Compound every N days; 0 for simple interest"
    )]
    pub compounding_days: u32,
    #[arg(long, default_value_t = 3650, help = "Investment term in days")]
    pub term_days: u32,
    #[arg(long, default_value_t = 0.0, help = "Amount added on every contribution day")]
    pub additional_amount: f64,
    #[arg(
        long,
        default_value_t = 0,
        help = "Add a contribution every N days; 0 disables contributions"
    )]
    pub additional_frequency: u32,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Monthly income target (balance * rate / 12); 0 skips the search"
    )]
    pub target_income: f64,
    #[arg(long, value_enum, default_value_t = CliLanguage::En)]
    pub lang: CliLanguage,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalculationRequest {
    pub params: SimulationParams,
    pub term_days: u32,
    pub target_income: f64,
    pub lang: Language,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayStrings {
    pub final_amount: String,
    pub total_profit: String,
    pub double: String,
    pub tenfold: String,
    pub hundredfold: String,
    pub target_income: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationReport {
    pub principal: f64,
    pub term_days: u32,
    pub final_amount: f64,
    pub total_profit: f64,
    pub effective_rate: f64,
    pub average_profits: ProfitSummary,
    pub monthly_plan: Vec<MonthlyRecord>,
    pub milestones: MilestoneResult,
    pub display: DisplayStrings,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

pub fn build_request(args: CalcArgs) -> Result<CalculationRequest, ApiError> {
    for (name, value) in [
        ("--principal", args.principal),
        ("--additional-amount", args.additional_amount),
        ("--target-income", args.target_income),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ApiError::InvalidInput(format!("{name} must be >= 0")));
        }
    }

    if !args.rate.is_finite() || args.rate <= -100.0 {
        return Err(ApiError::InvalidInput("--rate must be > -100".to_string()));
    }

    if args.term_days > MAX_HORIZON_DAYS {
        return Err(ApiError::InvalidInput(format!(
            "--term-days must be <= {MAX_HORIZON_DAYS} (100 years)"
        )));
    }

    Ok(CalculationRequest {
        params: SimulationParams {
            principal: args.principal,
            annual_rate_percent: args.rate,
            compounding_days: args.compounding_days,
            additional_amount: args.additional_amount,
            additional_frequency: args.additional_frequency,
        },
        term_days: args.term_days,
        target_income: args.target_income,
        lang: args.lang.into(),
    })
}

pub fn calculate(request: &CalculationRequest) -> CalculationReport {
    let params = &request.params;
    let principal = params.principal;
    let term_days = request.term_days;

    let final_amount = compound_interest(params, term_days);
    let total_profit = final_amount - principal;
    let milestones = milestones(params, request.target_income);
    let lang = request.lang;
    let period = |days: u32| format_time_period(days as f64, lang);

    CalculationReport {
        principal,
        term_days,
        final_amount,
        total_profit,
        effective_rate: effective_rate(principal, final_amount, term_days),
        average_profits: average_profits(principal, final_amount, term_days),
        monthly_plan: monthly_plan(params, term_days),
        milestones,
        display: DisplayStrings {
            final_amount: format_number(final_amount),
            total_profit: format_number(total_profit),
            double: period(milestones.double),
            tenfold: period(milestones.tenfold),
            hundredfold: period(milestones.hundredfold),
            target_income: period(milestones.target_income),
        },
    }
}

pub fn render_summary(report: &CalculationReport, lang: Language) -> String {
    let labels = match lang {
        Language::En => [
            "Final amount",
            "Total profit",
            "Effective annual rate",
            "Average monthly profit",
            "Average annual profit",
            "Time to double",
            "Time to 10x",
            "Time to 100x",
            "Time to target income",
        ],
        Language::Ru => [
            "Итоговая сумма",
            "Общая прибыль",
            "Эффективная годовая ставка",
            "Средняя прибыль в месяц",
            "Средняя прибыль в год",
            "Время до удвоения",
            "Время до 10x",
            "Время до 100x",
            "Время до целевого дохода",
        ],
    };
    let profits = &report.average_profits;
    let display = &report.display;
    let values = [
        display.final_amount.clone(),
        display.total_profit.clone(),
        format!("{:.2}%", report.effective_rate),
        format!(
            "{} ({:.2}%)",
            format_number(profits.monthly),
            profits.monthly_percent
        ),
        format!(
            "{} ({:.2}%)",
            format_number(profits.annual),
            profits.annual_percent
        ),
        display.double.clone(),
        display.tenfold.clone(),
        display.hundredfold.clone(),
        display.target_income.clone(),
    ];

    let mut out = String::new();
    for (label, value) in labels.iter().zip(values.iter()) {
        out.push_str(&format!("{label}: {value}\n"));
    }
    out
}

pub async fn run_http_server(addr: SocketAddr) -> std::io::Result<()> {
    let app = router();

    let listener = TcpListener::bind(addr).await?;
    info!("compound interest HTTP API listening on http://{addr}");

    axum::serve(listener, app).await
}

fn router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/calculate",
            get(calculate_get_handler).post(calculate_post_handler),
        )
        .fallback(not_found_handler)
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn calculate_get_handler(
    payload: Result<Query<CalculatePayload>, QueryRejection>,
) -> Response {
    match payload {
        Ok(Query(payload)) => calculate_handler_impl(payload).await,
        Err(rejection) => api_error_response(ApiError::InvalidPayload(rejection.body_text())),
    }
}

async fn calculate_post_handler(payload: Result<Json<CalculatePayload>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(payload)) => calculate_handler_impl(payload).await,
        Err(rejection) => api_error_response(ApiError::InvalidPayload(rejection.body_text())),
    }
}

async fn calculate_handler_impl(payload: CalculatePayload) -> Response {
    let request = match request_from_payload(payload) {
        Ok(request) => request,
        Err(err) => return api_error_response(err),
    };

    debug!(
        principal = request.params.principal,
        rate = request.params.annual_rate_percent,
        compounding_days = request.params.compounding_days,
        term_days = request.term_days,
        "running calculation"
    );
    json_response(StatusCode::OK, calculate(&request))
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

fn api_error_response(err: ApiError) -> Response {
    warn!("rejected calculation request: {err}");
    error_response(err.status(), &err.to_string())
}

#[cfg(test)]
fn request_from_json(json: &str) -> Result<CalculationRequest, ApiError> {
    let payload = serde_json::from_str::<CalculatePayload>(json)
        .map_err(|e| ApiError::InvalidPayload(e.to_string()))?;
    request_from_payload(payload)
}

fn request_from_payload(payload: CalculatePayload) -> Result<CalculationRequest, ApiError> {
    let mut args = default_args_for_api();

    if let Some(v) = payload.principal {
        args.principal = v;
    }
    if let Some(v) = payload.rate {
        args.rate = v;
    }
    if let Some(v) = payload.compounding_days {
        args.compounding_days = v;
    }
    if let Some(v) = payload.term_days {
        args.term_days = v;
    }
    if let Some(v) = payload.additional_amount {
        args.additional_amount = v;
    }
    if let Some(v) = payload.additional_frequency {
        args.additional_frequency = v;
    }
    if let Some(v) = payload.target_income {
        args.target_income = v;
    }
    if let Some(v) = payload.lang {
        args.lang = v.into();
    }

    build_request(args)
}

pub fn default_args_for_api() -> CalcArgs {
    CalcArgs {
        principal: 10_000.0,
        rate: 8.0,
        compounding_days: 30,
        term_days: 3650,
        additional_amount: 0.0,
        additional_frequency: 0,
        target_income: 0.0,
        lang: CliLanguage::En,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    fn assert_approx_tol(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn sample_args() -> CalcArgs {
        default_args_for_api()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        serde_json::from_slice(&bytes).expect("body should be json")
    }

    #[test]
    fn build_request_accepts_api_defaults() {
        let request = build_request(sample_args()).expect("valid request");
        assert_eq!(request.term_days, 3650);
        assert_eq!(request.params.compounding_days, 30);
        assert_eq!(request.lang, Language::En);
        assert_approx_tol(request.params.annual_rate_percent, 8.0, 1e-12);
    }

    #[test]
    fn build_request_rejects_negative_principal() {
        let mut args = sample_args();
        args.principal = -1.0;
        let err = build_request(args).expect_err("must reject negative principal");
        assert!(err.to_string().contains("--principal"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn build_request_rejects_non_finite_amounts() {
        let mut args = sample_args();
        args.additional_amount = f64::INFINITY;
        let err = build_request(args).expect_err("must reject infinite contribution");
        assert!(err.to_string().contains("--additional-amount"));

        let mut args = sample_args();
        args.rate = f64::NAN;
        let err = build_request(args).expect_err("must reject NaN rate");
        assert!(err.to_string().contains("--rate"));
    }

    #[test]
    fn build_request_rejects_term_beyond_hundred_years() {
        let mut args = sample_args();
        args.term_days = MAX_HORIZON_DAYS + 1;
        let err = build_request(args).expect_err("must cap the horizon");
        assert!(err.to_string().contains("--term-days"));

        let mut args = sample_args();
        args.term_days = MAX_HORIZON_DAYS;
        assert!(build_request(args).is_ok());
    }

    #[test]
    fn request_from_json_parses_web_keys() {
        let json = r#"{
          "principal": 1000,
          "rate": 10,
          "compoundingDays": 365,
          "termDays": 730,
          "additionalAmount": 100,
          "additionalFrequency": 30,
          "targetIncome": 100,
          "lang": "ru"
        }"#;
        let request = request_from_json(json).expect("json should parse");

        assert_approx_tol(request.params.principal, 1_000.0, 1e-12);
        assert_approx_tol(request.params.annual_rate_percent, 10.0, 1e-12);
        assert_eq!(request.params.compounding_days, 365);
        assert_eq!(request.term_days, 730);
        assert_approx_tol(request.params.additional_amount, 100.0, 1e-12);
        assert_eq!(request.params.additional_frequency, 30);
        assert_approx_tol(request.target_income, 100.0, 1e-12);
        assert_eq!(request.lang, Language::Ru);
    }

    #[test]
    fn request_from_json_rejects_negative_day_counts() {
        let err = request_from_json(r#"{"termDays": -5}"#).expect_err("u32 day counts");
        assert!(matches!(err, ApiError::InvalidPayload(_)));
    }

    #[test]
    fn request_from_json_rejects_unknown_language() {
        let err = request_from_json(r#"{"lang": "de"}"#).expect_err("only en and ru");
        assert!(matches!(err, ApiError::InvalidPayload(_)));
    }

    #[test]
    fn calculate_builds_full_report() {
        let mut args = sample_args();
        args.principal = 10_000.0;
        args.rate = 8.0;
        args.compounding_days = 365;
        args.term_days = 3650;
        let request = build_request(args).expect("valid request");

        let report = calculate(&request);
        assert_approx_tol(report.final_amount, 21_589.25, 0.005);
        assert_approx_tol(report.total_profit, 11_589.25, 0.005);
        assert_approx_tol(report.effective_rate, 8.0, 0.005);
        assert_eq!(report.monthly_plan.len(), 122);
        assert_eq!(report.display.final_amount, "21.6K");
        assert_eq!(report.display.target_income, "Never");
        assert!(report.milestones.double > 0);
    }

    #[test]
    fn calculate_localizes_milestones() {
        let mut args = sample_args();
        args.principal = 1_000.0;
        args.rate = 10.0;
        args.compounding_days = 365;
        args.lang = CliLanguage::Ru;
        let request = build_request(args).expect("valid request");

        let report = calculate(&request);
        assert_eq!(report.milestones.double, 2920);
        assert_eq!(report.display.double, "8 лет");
    }

    #[test]
    fn report_serialization_contains_expected_fields() {
        let request = build_request(sample_args()).expect("valid request");
        let json = serde_json::to_string(&calculate(&request)).expect("report should serialize");

        assert!(json.contains("\"finalAmount\""));
        assert!(json.contains("\"effectiveRate\""));
        assert!(json.contains("\"averageProfits\""));
        assert!(json.contains("\"monthlyPercent\""));
        assert!(json.contains("\"monthlyPlan\""));
        assert!(json.contains("\"cumulativeAmount\""));
        assert!(json.contains("\"percentageOfInitial\""));
        assert!(json.contains("\"hundredfold\""));
        assert!(json.contains("\"targetIncome\""));
        assert!(json.contains("\"display\""));
    }

    #[test]
    fn render_summary_lists_every_figure() {
        let request = build_request(sample_args()).expect("valid request");
        let report = calculate(&request);

        let text = render_summary(&report, Language::En);
        assert_eq!(text.lines().count(), 9);
        assert!(text.starts_with(&format!("Final amount: {}", report.display.final_amount)));
        assert!(text.contains("Time to target income: Never"));

        let text = render_summary(&report, Language::Ru);
        assert!(text.starts_with("Итоговая сумма: "));
    }

    #[tokio::test]
    async fn calculate_handler_returns_report_json() {
        let payload = CalculatePayload {
            principal: Some(1_000.0),
            rate: Some(12.0),
            compounding_days: Some(30),
            term_days: Some(90),
            ..CalculatePayload::default()
        };
        let response = calculate_handler_impl(payload).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).map(|v| v.as_bytes()),
            Some(&b"no-store"[..])
        );

        let body = body_json(response).await;
        let plan = body["monthlyPlan"].as_array().expect("plan array");
        assert_eq!(plan.len(), 3);
        let last = plan[2]["cumulativeAmount"].as_f64().expect("number");
        assert_approx_tol(last, 1_029.88, 0.005);
    }

    #[tokio::test]
    async fn calculate_handler_rejects_invalid_input() {
        let payload = CalculatePayload {
            principal: Some(-10.0),
            ..CalculatePayload::default()
        };
        let response = calculate_handler_impl(payload).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert!(
            body["error"]
                .as_str()
                .is_some_and(|msg| msg.contains("--principal"))
        );
    }

    #[tokio::test]
    async fn health_and_fallback_respond_with_json() {
        let response = health_handler().await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");

        let response = not_found_handler().await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "Not found");
    }
}
