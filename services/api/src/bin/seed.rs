//! Populate a development database with a few users and their ads.
//!
//! Every seeded user has the password `password123`. Running the seeder again
//! reuses existing users and adds another batch of ads.

use anyhow::Result;
use rand::Rng;
use rust_decimal::Decimal;
use tracing::info;

use api::{
    models::ad::NewAd,
    repositories::{AdStore, PgAdRepository},
};
use auth::{
    PasswordService,
    models::NewUser,
    repositories::{PgUserRepository, UserStore},
};
use common::{
    database::{DatabaseConfig, init_pool, run_migrations},
    error::StoreError,
};

const NUM_USERS: usize = 5;
const ADS_PER_USER: usize = 5;
const PASSWORD: &str = "password123";

const ITEMS: &[&str] = &[
    "Bicycle", "Desk lamp", "Armchair", "Guitar", "Camera", "Bookshelf", "Kettle", "Backpack",
];
const CONDITIONS: &[&str] = &["Like new", "Lightly used", "Well loved", "Needs repair"];

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    api::init_tracing()?;

    let pool = init_pool(&DatabaseConfig::from_env()?).await?;
    run_migrations(&pool).await?;

    let users = PgUserRepository::new(pool.clone());
    let ads = PgAdRepository::new(pool);
    let passwords = PasswordService::default();
    let password_hash = passwords.hash(PASSWORD)?;

    for n in 1..=NUM_USERS {
        let username = format!("seeduser{n}");
        let user = match users
            .insert(&NewUser::new(username.clone(), password_hash.clone()))
            .await
        {
            Ok(user) => user,
            Err(StoreError::Conflict) => users.get_by_handle(&username).await?,
            Err(e) => return Err(e.into()),
        };

        for _ in 0..ADS_PER_USER {
            let new_ad = random_ad(&mut rand::thread_rng(), user.guid);
            let ad = ads.insert(&new_ad).await?;
            info!(ad_id = ad.id, "Seeded ad for {}", user.username);
        }
    }

    info!(
        "Seeded {} users with {} ads each (password: {})",
        NUM_USERS, ADS_PER_USER, PASSWORD
    );

    Ok(())
}

fn random_ad(rng: &mut impl Rng, owner: uuid::Uuid) -> NewAd {
    let item = ITEMS[rng.gen_range(0..ITEMS.len())];
    let condition = CONDITIONS[rng.gen_range(0..CONDITIONS.len())];
    let cents: i64 = rng.gen_range(100..100_000);

    NewAd {
        user_guid: owner,
        title: format!("{item} ({condition})"),
        description: format!("{condition} {} available for pickup.", item.to_lowercase()),
        image_url: format!(
            "https://picsum.photos/seed/{}/640/480",
            rng.gen_range(1..10_000)
        ),
        price: Decimal::new(cents, 2),
    }
}
