use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub enum BillingCycleDoc { Monthly, Weekly, Yearly }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct SubscriptionDoc {
    pub id: i64,
    #[schema(example = "Netflix")]
    pub name: String,
    #[schema(example = 15.99)]
    pub amount: f64,
    pub billing_cycle: BillingCycleDoc,
    #[schema(example = "2024-06-01")]
    pub next_billing_date: String,
    #[schema(example = "Entertainment")]
    pub category: String,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct SubscriptionPayloadDoc {
    pub name: String,
    pub amount: f64,
    pub billing_cycle: BillingCycleDoc,
    pub next_billing_date: String,
    pub category: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::subscriptions::list,
        crate::routes::subscriptions::get,
        crate::routes::subscriptions::create,
        crate::routes::subscriptions::update,
        crate::routes::subscriptions::delete,
    ),
    components(
        schemas(
            HealthResponse,
            BillingCycleDoc,
            SubscriptionDoc,
            SubscriptionPayloadDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "subscriptions")
    )
)]
pub struct ApiDoc;
