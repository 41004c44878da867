use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

pub const CATEGORIES: [(&str, &str); 5] = [
    ("Electronics", "Electronic devices and gadgets"),
    ("Books", "Books and educational materials"),
    ("Clothing", "Fashion and apparel"),
    ("Home & Garden", "Home improvement and gardening"),
    ("Sports", "Sports and outdoor equipment"),
];

const ADJECTIVES: [&str; 8] = [
    "Adaptive",
    "Compact",
    "Durable",
    "Ergonomic",
    "Portable",
    "Premium",
    "Smart",
    "Wireless",
];

const NOUNS: [&str; 8] = [
    "Backpack", "Charger", "Headset", "Lamp", "Notebook", "Planter", "Racket", "Speaker",
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FixtureSummary {
    pub categories_created: usize,
    pub products_attempted: usize,
    pub products_created: usize,
}

/// Seeds categories and products through the target's public API.
///
/// Every individual failure is ignored; a target that rejects all of them
/// still yields a usable run.
pub async fn create_test_data(
    client: &Client,
    base_url: &str,
    product_count: usize,
) -> FixtureSummary {
    let mut summary = FixtureSummary::default();

    let mut category_ids = Vec::new();
    for (name, description) in CATEGORIES {
        let body = json!({ "name": name, "description": description });
        match post_json(client, &format!("{}/categories", base_url), &body).await {
            Some((200, payload)) => {
                let id = payload
                    .as_ref()
                    .and_then(|value| value.get("id"))
                    .and_then(Value::as_i64);
                if let Some(id) = id {
                    category_ids.push(id);
                }
            }
            Some((status, _)) => debug!(category = name, status, "category not created"),
            None => {}
        }
    }
    summary.categories_created = category_ids.len();

    for _ in 0..product_count {
        let product = {
            let mut rng = rand::thread_rng();
            random_product(&mut rng, &category_ids)
        };
        summary.products_attempted += 1;
        if let Some((status, _)) =
            post_json(client, &format!("{}/products", base_url), &product).await
        {
            if (200..300).contains(&status) {
                summary.products_created += 1;
            } else {
                debug!(status, "product not created");
            }
        }
    }

    info!(
        categories = summary.categories_created,
        products = summary.products_created,
        attempted = summary.products_attempted,
        "test data created"
    );
    summary
}

async fn post_json(client: &Client, url: &str, body: &Value) -> Option<(u16, Option<Value>)> {
    let response = match client.post(url).json(body).send().await {
        Ok(response) => response,
        Err(err) => {
            debug!(url, error = %err, "fixture request failed");
            return None;
        }
    };
    let status = response.status().as_u16();
    let payload = response.json::<Value>().await.ok();
    Some((status, payload))
}

pub fn random_product<R: Rng + ?Sized>(rng: &mut R, category_ids: &[i64]) -> Value {
    let category_id = category_ids.choose(rng).copied().unwrap_or(1);
    let adjective = ADJECTIVES.choose(rng).copied().unwrap_or("Generic");
    let noun = NOUNS.choose(rng).copied().unwrap_or("Item");
    let price = (rng.gen_range(10.0..=500.0_f64) * 100.0).round() / 100.0;
    let sku: String = Uuid::new_v4().simple().to_string()[..8].to_uppercase();

    json!({
        "name": format!("{} {}", adjective, noun),
        "description": format!(
            "{} {} for everyday use, generated for load testing.",
            adjective, noun.to_lowercase()
        ),
        "price": price,
        "stock_quantity": rng.gen_range(0..=100),
        "category_id": category_id,
        "sku": sku,
    })
}
