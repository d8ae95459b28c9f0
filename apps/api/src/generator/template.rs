//! Deterministic copy templates with randomized metric estimates.

use std::ops::Range;

use async_trait::async_trait;
use rand::Rng;

use crate::campaign::models::CampaignRequest;
use crate::generator::{CopyGenerator, GeneratedCopy, GeneratorError};
use crate::models::campaign::{Metrics, NewVersion};

pub const OPEN_RATE_RANGE: Range<i32> = 65..85;
pub const CLICK_THROUGH_RANGE: Range<i32> = 12..20;
pub const CONVERSION_RANGE: Range<i32> = 8..13;

pub struct TemplateCopyGenerator;

#[async_trait]
impl CopyGenerator for TemplateCopyGenerator {
    async fn generate(&self, request: &CampaignRequest) -> Result<GeneratedCopy, GeneratorError> {
        Ok(render(request))
    }

    fn backend(&self) -> &'static str {
        "template"
    }
}

fn render(request: &CampaignRequest) -> GeneratedCopy {
    let mut rng = rand::thread_rng();
    GeneratedCopy {
        version_a: NewVersion {
            title: format!("{} {} Campaign - Version A", request.tone, request.brand_name),
            content: version_a_body(request),
            metrics: random_metrics(&mut rng),
        },
        version_b: NewVersion {
            title: format!("{} {} Campaign - Version B", request.tone, request.brand_name),
            content: version_b_body(request),
            metrics: random_metrics(&mut rng),
        },
    }
}

fn random_metrics(rng: &mut impl Rng) -> Metrics {
    Metrics {
        open_rate: rng.gen_range(OPEN_RATE_RANGE),
        click_through_rate: rng.gen_range(CLICK_THROUGH_RANGE),
        conversion_rate: rng.gen_range(CONVERSION_RANGE),
    }
}

fn is_everyone(audience_type: &str) -> bool {
    audience_type.trim().eq_ignore_ascii_case("all")
}

fn product_phrase(request: &CampaignRequest) -> String {
    match request.product_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("{}'s latest collection", request.brand_name),
    }
}

fn version_a_body(request: &CampaignRequest) -> String {
    let audience = if is_everyone(&request.audience_type) {
        "everyone".to_string()
    } else {
        request.audience_type.to_lowercase()
    };
    let pitch = match request.tone.as_str() {
        "Professional" => "Premium quality, backed by exceptional service.",
        "Friendly" => "Come join our community and enjoy the perks!",
        _ => "This limited-time opportunity won't wait.",
    };
    format!(
        "Made for {category} fans!\n\n\
         Meet {product}, designed for {audience} aged {min}-{max}.\n\n\
         {pitch}\n\n\
         Launch offer: 25% off\n\
         Free shipping on orders over $50\n\
         Member-only perks\n\n\
         Shop today and upgrade your {category_lower} routine!",
        category = request.audience_category,
        product = product_phrase(request),
        audience = audience,
        min = request.min_age,
        max = request.max_age,
        pitch = pitch,
        category_lower = request.audience_category.to_lowercase(),
    )
}

fn version_b_body(request: &CampaignRequest) -> String {
    let audience = if is_everyone(&request.audience_type) {
        "all of our customers".to_string()
    } else {
        format!("{} customers", request.audience_type.to_lowercase())
    };
    let pitch = match request.tone.as_str() {
        "Professional" => "Raise the bar with solutions built to last.",
        "Friendly" => "We've got something special to share with you!",
        _ => "Move quickly, this deal ends soon!",
    };
    format!(
        "{brand} presents the ultimate {category} experience!\n\n\
         Built for {audience} between {min} and {max}.\n\n\
         {pitch}\n\n\
         Inside:\n\
         - Premium {category} picks\n\
         - Priority support\n\
         - Member discounts\n\
         - Early access to new releases\n\n\
         Claim your {tone_lower} {brand} advantage today!",
        brand = request.brand_name,
        category = request.audience_category,
        audience = audience,
        min = request.min_age,
        max = request.max_age,
        pitch = pitch,
        tone_lower = request.tone.to_lowercase(),
    )
}
