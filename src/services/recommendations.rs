use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{
        Gender, OutfitRecommendation, PreferenceRecord, RecommendationMode, RecommendationRequest,
    },
    services::{
        preferences::PreferenceAdjuster,
        products::ProductLookup,
        text_generation::{is_sentinel, TextGenerator, NO_RECOMMENDATION},
        trends::{TrendLookup, MAX_TRENDS},
    },
};

/// Phrase the closet prompt asks the model to emit when no outfit is possible
pub const INSUFFICIENT_CLOSET_MARKER: &str = "No suitable combination found in the closet";

pub const EMPTY_CLOSET_MESSAGE: &str =
    "Your closet is empty. Please add some items first or switch to 'General outfit idea'!";

pub const FALLBACK_PREFACE: &str = "Your closet doesn't have enough items for a complete outfit, so here is a general recommendation instead:\n\n";

/// True when a closet-constrained answer means the closet could not cover the request
///
/// Relies on the model echoing the marker phrase verbatim; prose that refuses
/// in other words is not detected.
pub fn is_insufficient_closet_response(text: &str) -> bool {
    let text = text.to_lowercase();
    text.contains(&INSUFFICIENT_CLOSET_MARKER.to_lowercase())
        || text.contains(&NO_RECOMMENDATION.trim_end_matches('.').to_lowercase())
}

fn gender_constraint(gender: Gender) -> &'static str {
    match gender {
        Gender::Man => "Do not recommend items typically worn by women. ",
        Gender::Woman => "Do not recommend items typically worn by men. ",
        Gender::Neutral => "Keep the outfit gender-neutral. ",
    }
}

fn outfit_subject(gender: Gender) -> String {
    match gender {
        Gender::Neutral => "gender-neutral".to_string(),
        other => format!("{}'s", other),
    }
}

fn shared_constraints(request: &RecommendationRequest, trends: &[String]) -> String {
    let mut constraints = String::new();

    if !trends.is_empty() {
        constraints.push_str(&format!(
            "Where it fits, draw on these current trends: {}. ",
            trends.join(", ")
        ));
    }

    if let Some(disliked) = request.disliked() {
        constraints.push_str(&format!(
            "The previous recommendation, '{}', was not liked. Please provide a new recommendation that is significantly different and does not include any of the items mentioned in the disliked outfit. ",
            disliked
        ));
    }

    constraints.push_str("Explain why this outfit is recommended, but keep the output text concise.");
    constraints
}

/// Prompt restricted to the user's closet
pub fn closet_prompt(closet: &[String], request: &RecommendationRequest, trends: &[String]) -> String {
    format!(
        "You are a professional stylist. Recommend a stylish {subject} outfit \
         based on a closet containing the following items: {items}. \
         For the occasion: '{occasion}', in the style of: '{style}', \
         please recommend a single, complete, and stylish outfit. \
         The outfit must be a logical combination of clothing items, for example do not pair a skirt or shirt with a dress. \
         {gender}\
         Do not include items that are not in the closet. \
         If a complete and logical outfit is not possible with the available items, reply only with: \"{marker}\". \
         {shared}",
        subject = outfit_subject(request.gender),
        items = closet.join(", "),
        occasion = request.occasion,
        style = request.style,
        gender = gender_constraint(request.gender),
        marker = INSUFFICIENT_CLOSET_MARKER,
        shared = shared_constraints(request, trends),
    )
}

/// Prompt without any closet restriction
pub fn general_prompt(request: &RecommendationRequest, trends: &[String]) -> String {
    format!(
        "You are a professional fashion stylist. Recommend a stylish {subject} outfit. \
         For a '{occasion}' occasion and a '{style}' style, \
         please recommend a single, complete, and stylish outfit. \
         The outfit must include exactly one top and one bottom, or one complete garment such as a dress or jumpsuit. \
         The recommendation should be practical and fashionable. \
         The outfit must be a logical combination of clothing items, for example do not pair a skirt or shirt with a dress. \
         {gender}\
         {shared}",
        subject = outfit_subject(request.gender),
        occasion = request.occasion,
        style = request.style,
        gender = gender_constraint(request.gender),
        shared = shared_constraints(request, trends),
    )
}

/// Prompt for three alternatives to an already suggested outfit
pub fn alternatives_prompt(
    closet: &[String],
    request: &RecommendationRequest,
    base_outfit: &str,
    trends: &[String],
    insights: &str,
) -> String {
    format!(
        "You are a fashion recommendation agent.\n\
         The user closet: {closet}\n\
         Occasion: {occasion}\n\
         Style preference: {style}\n\
         Trends to consider: {trends}\n\
         Trend insights: {insights}\n\
         Already suggested outfit: {base_outfit}\n\n\
         Task:\n\
         Suggest 3 *different* alternative outfits (use closet items where possible).\n\
         Each outfit should be short, clear, and stylish.\n\
         Format:\n\
         - Outfit 1: ...\n\
         - Outfit 2: ...\n\
         - Outfit 3: ...",
        closet = closet.join(", "),
        occasion = request.occasion,
        style = request.style,
        trends = trends.join(", "),
    )
}

/// Outcome of the generation stage, before the fallback preface is applied
struct Generated {
    text: String,
    is_fallback: bool,
}

/// Runs the closet -> trends -> outfit -> preferences -> products pipeline
///
/// Every upstream failure degrades into a soft value. The only error is
/// [`AppError::EmptyCloset`], returned before any upstream call.
#[derive(Clone)]
pub struct RecommendationService {
    generator: Arc<dyn TextGenerator>,
    trends: TrendLookup,
    adjuster: PreferenceAdjuster,
    products: ProductLookup,
}

impl RecommendationService {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        trends: TrendLookup,
        adjuster: PreferenceAdjuster,
        products: ProductLookup,
    ) -> Self {
        Self {
            generator,
            trends,
            adjuster,
            products,
        }
    }

    pub fn trend_lookup(&self) -> &TrendLookup {
        &self.trends
    }

    pub fn product_lookup(&self) -> &ProductLookup {
        &self.products
    }

    async fn resolve_trends(&self, request: &RecommendationRequest) -> Vec<String> {
        match &request.trends {
            Some(trends) => trends.iter().take(MAX_TRENDS).cloned().collect(),
            None => {
                let query = format!("{} {} fashion trends", request.occasion, request.style);
                self.trends.lookup(query.trim()).await
            }
        }
    }

    async fn generate_outfit(
        &self,
        closet: &[String],
        request: &RecommendationRequest,
        trends: &[String],
    ) -> Generated {
        if request.mode == RecommendationMode::Closet {
            let text = self
                .generator
                .generate(&closet_prompt(closet, request, trends))
                .await;

            if !is_insufficient_closet_response(&text) {
                return Generated {
                    text,
                    is_fallback: false,
                };
            }

            tracing::info!(
                closet_items = closet.len(),
                "Closet cannot cover the request, falling back to a general outfit"
            );

            return Generated {
                text: self.generator.generate(&general_prompt(request, trends)).await,
                is_fallback: true,
            };
        }

        Generated {
            text: self.generator.generate(&general_prompt(request, trends)).await,
            is_fallback: false,
        }
    }

    pub async fn recommend(
        &self,
        closet: &[String],
        request: &RecommendationRequest,
        preferences: &PreferenceRecord,
    ) -> AppResult<OutfitRecommendation> {
        if request.mode == RecommendationMode::Closet && closet.is_empty() {
            return Err(AppError::EmptyCloset(EMPTY_CLOSET_MESSAGE.to_string()));
        }

        let trends = self.resolve_trends(request).await;
        let generated = self.generate_outfit(closet, request, &trends).await;

        let preface = if generated.is_fallback {
            FALLBACK_PREFACE
        } else {
            ""
        };

        if is_sentinel(&generated.text) {
            tracing::warn!(mode = ?request.mode, text = %generated.text, "Text generation ended on a sentinel");
            return Ok(OutfitRecommendation {
                recommendation: format!("{}{}", preface, generated.text),
                reasons: Vec::new(),
                trends_considered: trends,
                shopping_links: Vec::new(),
                is_fallback: generated.is_fallback,
            });
        }

        // After a fallback the closet constraint no longer applies to the text.
        let effective_mode = if generated.is_fallback {
            RecommendationMode::General
        } else {
            request.mode
        };

        let adjusted = self
            .adjuster
            .adjust(&generated.text, preferences, effective_mode)
            .await;

        let shopping_links = self.products.search(&adjusted.outfit).await;

        tracing::info!(
            mode = ?request.mode,
            is_fallback = generated.is_fallback,
            trends = trends.len(),
            reasons = adjusted.reasons.len(),
            links = shopping_links.len(),
            "Recommendation completed"
        );

        Ok(OutfitRecommendation {
            recommendation: format!("{}{}", preface, adjusted.outfit),
            reasons: adjusted.reasons,
            trends_considered: trends,
            shopping_links,
            is_fallback: generated.is_fallback,
        })
    }

    /// Three alternative outfits next to `base_outfit`; sentinel text on upstream failure
    pub async fn suggest_alternatives(
        &self,
        closet: &[String],
        request: &RecommendationRequest,
        base_outfit: &str,
        trends: &[String],
        insights: &str,
    ) -> String {
        self.generator
            .generate(&alternatives_prompt(closet, request, base_outfit, trends, insights))
            .await
    }
}
