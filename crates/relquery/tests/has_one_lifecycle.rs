use asupersync::runtime::RuntimeBuilder;
use relquery::prelude::*;
use relquery::{AssociationKind, DynamicFactory, FromFields};
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

fn unwrap_outcome<T>(outcome: Outcome<T, Error>) -> T {
    match outcome {
        Outcome::Ok(v) => v,
        Outcome::Err(e) => panic!("unexpected error: {e}"),
        Outcome::Cancelled(r) => panic!("cancelled: {r:?}"),
        Outcome::Panicked(p) => panic!("panicked: {p:?}"),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct User {
    id: i64,
    name: String,
    profile: HasOne<Profile>,
}

impl Schema for User {
    const MODEL: &'static str = "users";

    fn associations() -> &'static [RelationshipDescriptor] {
        const ASSOCS: &[RelationshipDescriptor] = &[RelationshipDescriptor::has_one(
            "profile",
            ModelId::of::<User>(),
            ModelId::of::<Profile>(),
            "user_id",
        )];
        ASSOCS
    }
}

impl User {
    fn new(id: i64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            profile: HasOne::on::<User>("profile").with_primary_key(id),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
struct Profile {
    user_id: Option<i64>,
    bio: String,
}

impl Schema for Profile {
    const MODEL: &'static str = "profiles";
}

impl FromFields for Profile {
    fn from_fields(fields: Vec<(String, Value)>) -> Result<Self> {
        let mut profile = Profile::default();
        for (field, value) in fields {
            match field.as_str() {
                "user_id" => profile.user_id = value.try_into()?,
                "bio" => profile.bio = value.try_into()?,
                _ => {}
            }
        }
        Ok(profile)
    }
}

/// In-memory stand-in for a session fetching profiles by foreign key.
#[derive(Default)]
struct ProfileStore {
    rows: HashMap<i64, Profile>,
    fetches: usize,
}

impl ProfileStore {
    fn insert(&mut self, profile: Profile) {
        if let Some(id) = profile.user_id {
            self.rows.insert(id, profile);
        }
    }
}

impl AssociationLoader<Profile> for ProfileStore {
    fn fetch(
        &mut self,
        _cx: &Cx,
        descriptor: &RelationshipDescriptor,
        key: Value,
    ) -> impl Future<Output = Outcome<Option<Profile>, Error>> + Send {
        self.fetches += 1;
        assert_eq!(descriptor.assoc_key, "user_id");
        let found = key.as_i64().and_then(|id| self.rows.get(&id).cloned());
        async move { Outcome::Ok(found) }
    }
}

#[test]
fn fresh_owner_has_unloaded_association() {
    let user = User::new(1, "ada");
    assert!(!user.profile.is_loaded());
    assert!(user.profile.resolve().unwrap_err().is_not_loaded());

    let err = user.profile.resolve().unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("association profile is not loaded on users ({})", AssociationKind::HasOne)
    );
}

#[test]
fn build_then_load_round_trip() {
    let rt = RuntimeBuilder::current_thread()
        .build()
        .expect("create asupersync runtime");
    let cx = Cx::for_testing();

    rt.block_on(async {
        let mut user = User::new(7, "grace");
        let mut store = ProfileStore::default();

        let draft = user
            .profile
            .build_with(
                &StaticReflection,
                &TypedFactory::<Profile>::new(),
                [("bio", "compilers")],
            )
            .unwrap();
        assert_eq!(draft.user_id, Some(7));
        store.insert(draft.clone());

        user.profile = unwrap_outcome(user.profile.load(&cx, &StaticReflection, &mut store).await);
        assert_eq!(user.profile.resolve().unwrap(), Some(&draft));
        assert_eq!(store.fetches, 1);

        // Cached: loading again does not fetch.
        user.profile = unwrap_outcome(user.profile.load(&cx, &StaticReflection, &mut store).await);
        assert_eq!(store.fetches, 1);
    });
}

#[test]
fn owner_without_related_row_loads_as_none() {
    let rt = RuntimeBuilder::current_thread()
        .build()
        .expect("create asupersync runtime");
    let cx = Cx::for_testing();

    rt.block_on(async {
        let user = User::new(3, "linus");
        let mut store = ProfileStore::default();
        let loaded = unwrap_outcome(user.profile.load(&cx, &StaticReflection, &mut store).await);
        assert!(loaded.is_loaded());
        assert_eq!(loaded.resolve().unwrap(), None);
    });
}

#[test]
fn owner_serializes_loaded_association_inline() {
    let mut user = User::new(1, "ada");
    let json = serde_json::to_value(&user).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "id": 1, "name": "ada", "profile": null })
    );

    user.profile = user.profile.with_loaded(Some(Profile {
        user_id: Some(1),
        bio: "engines".to_string(),
    }));
    let json = serde_json::to_value(&user).unwrap();
    assert_eq!(json["profile"]["bio"], "engines");
}

#[test]
fn explicit_foreign_key_override_wins() {
    let user = User::new(1, "ada");
    let record = user
        .profile
        .build([("user_id", Value::BigInt(2)), ("bio", Value::from("x"))])
        .unwrap();
    assert_eq!(record.get("user_id"), Some(&Value::BigInt(2)));
    assert_eq!(record.model(), ModelId::of::<Profile>());
}

#[test]
fn copies_of_a_handle_are_independent() {
    let user = User::new(1, "ada");
    let copy = user.clone();
    let updated = copy.profile.with_loaded(None).with_primary_key(99_i64);

    assert!(!user.profile.is_loaded());
    assert_eq!(user.profile.primary_key(), &Value::BigInt(1));
    assert!(updated.is_loaded());
    assert_eq!(updated.primary_key(), &Value::BigInt(99));
    assert_eq!(updated.target(), user.profile.target());
    assert_eq!(updated.name(), user.profile.name());
}

#[test]
fn shared_registry_serves_handles_on_many_threads() {
    let registry = Arc::new(
        SchemaRegistry::new()
            .register_model::<User>()
            .register(RelationshipDescriptor::has_one(
                "settings",
                ModelId::named("tenants"),
                ModelId::named("tenant_settings"),
                "tenant_id",
            )),
    );

    let workers: Vec<_> = (0..4_i64)
        .map(|i| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                let handle = HasOne::<Record>::new("settings", ModelId::named("tenants"))
                    .with_primary_key(i);
                let record = handle
                    .build_with(&registry, &DynamicFactory, [("theme", "dark")])
                    .unwrap();
                let user = User::new(i, "worker");
                let summary = user.profile.describe(&registry).to_string();
                (record, summary)
            })
        })
        .collect();

    for (i, worker) in workers.into_iter().enumerate() {
        let (record, summary) = worker.join().unwrap();
        assert_eq!(record.get("tenant_id"), Some(&Value::BigInt(i as i64)));
        assert_eq!(summary, "has_one profile (users.id -> profiles.user_id)");
    }
}

#[test]
fn debug_rendering_reflects_metadata() {
    let user = User::new(1, "ada");
    let rendered = format!("{:?}", user.profile);
    assert!(rendered.contains("associated: \"profiles\""));
    assert!(rendered.contains("assoc_key: \"user_id\""));
    assert_eq!(
        user.profile.to_string(),
        "has_one profile (users.id -> profiles.user_id)"
    );
}
