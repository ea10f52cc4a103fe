//! Static informational endpoints: service metadata, resume templates, pricing.

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::state::AppState;

const PRO_PRICE_USD: u32 = 19;

#[derive(Debug, Serialize)]
pub struct ResumeTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub sections: &'static [&'static str],
    pub tips: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct TemplatesResponse {
    pub templates: &'static [ResumeTemplate],
}

const TEMPLATES: &[ResumeTemplate] = &[
    ResumeTemplate {
        id: "software-engineer",
        name: "Software Engineer",
        sections: &["Summary", "Skills", "Experience", "Projects", "Education"],
        tips: &[
            "Lead with technical skills",
            "Quantify impact",
            "Include GitHub/portfolio",
        ],
    },
    ResumeTemplate {
        id: "product-manager",
        name: "Product Manager",
        sections: &["Summary", "Experience", "Skills", "Education", "Certifications"],
        tips: &[
            "Focus on outcomes",
            "Highlight cross-functional work",
            "Show data-driven decisions",
        ],
    },
    ResumeTemplate {
        id: "data-scientist",
        name: "Data Scientist",
        sections: &[
            "Summary",
            "Skills",
            "Experience",
            "Projects",
            "Publications",
            "Education",
        ],
        tips: &[
            "List ML/AI frameworks",
            "Include model metrics",
            "Link to notebooks/papers",
        ],
    },
    ResumeTemplate {
        id: "designer",
        name: "UX/UI Designer",
        sections: &["Summary", "Portfolio", "Experience", "Skills", "Education"],
        tips: &[
            "Portfolio link is essential",
            "Show process, not just outcomes",
            "Include user research experience",
        ],
    },
];

/// GET /
pub async fn root_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "docs": "POST bodies are JSON, except /analyze/upload which takes a multipart `file` field. \
                 Send `x-api-key` for the Pro tier.",
        "endpoints": [
            "GET /health",
            "POST /analyze",
            "POST /analyze/upload",
            "POST /match",
            "POST /improve",
            "GET /templates",
            "GET /pricing"
        ],
        "pricing": {
            "free": format!("{} analyses per day", state.config.free_daily_limit),
            "pro": format!("${PRO_PRICE_USD}/month - unlimited")
        }
    }))
}

/// GET /templates
pub async fn templates_handler() -> Json<TemplatesResponse> {
    Json(TemplatesResponse {
        templates: TEMPLATES,
    })
}

/// GET /pricing
pub async fn pricing_handler(State(state): State<AppState>) -> Json<Value> {
    let mut pro = json!({
        "name": "Pro",
        "price": PRO_PRICE_USD,
        "period": "month",
        "limits": "Unlimited",
        "features": [
            "Unlimited analyses",
            "Priority processing",
            "AI-powered rewriting",
            "ATS optimization",
            "API access",
            "Email support"
        ]
    });
    if let Some(url) = &state.config.pro_signup_url {
        pro["signup_url"] = json!(url);
    }

    Json(json!({
        "plans": [
            {
                "name": "Free",
                "price": 0,
                "limits": format!("{} analyses per day", state.config.free_daily_limit),
                "features": ["Resume analysis", "Job matching", "Basic suggestions"]
            },
            pro
        ]
    }))
}
