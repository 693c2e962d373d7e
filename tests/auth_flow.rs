use swipebite::{
    auth::{AuthError, AuthState, check_sign_up},
    buddies::{BuddyBook, BuddyError},
    fixtures,
    persist::{KvStore, PersistError, PersistResult, load_json, memory::MemoryKvStore, save_json},
    session::{Session, SessionConfig, SessionError},
    types::keys,
    user::{MatchStatus, User},
};

fn demo_auth() -> AuthState {
    AuthState::new(fixtures::users().expect("users"))
}

/// Memory store that refuses writes to one key.
struct RefusingStore {
    inner: MemoryKvStore,
    refused: &'static str,
}

impl KvStore for RefusingStore {
    fn get(&self, key: &str) -> PersistResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> PersistResult<()> {
        if key == self.refused {
            return Err(PersistError::Message("disk full".to_string()));
        }
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) -> PersistResult<()> {
        self.inner.remove(key)
    }
}

#[test]
fn mismatched_credentials_fail_without_writes() {
    let mut store = MemoryKvStore::new();
    let mut auth = demo_auth();

    let err = auth
        .login(&mut store, "adam@example.com", "wrong-password")
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
    assert_eq!(err.to_string(), "Invalid email or password");
    assert_eq!(store.write_count(), 0);
    assert!(!auth.is_authenticated());

    let err = auth.login(&mut store, "", "password123").unwrap_err();
    assert!(matches!(err, AuthError::MissingFields));
    assert_eq!(store.write_count(), 0);
}

#[test]
fn login_with_demo_account_writes_current_user() {
    let mut store = MemoryKvStore::new();
    let mut auth = demo_auth();

    let user = auth
        .login(&mut store, "adam@example.com", "password123")
        .expect("login");
    assert_eq!(user.username, "foodie_adam");
    assert!(auth.is_authenticated());

    let stored: User = load_json(&store, keys::CURRENT_USER).unwrap().unwrap();
    assert_eq!(stored, user);
}

#[test]
fn register_persists_user_and_logs_in() {
    let mut store = MemoryKvStore::new();
    let mut auth = demo_auth();

    let user = auth
        .register(&mut store, "chai_lover", "chai@example.com", "masala42")
        .expect("register");
    assert_eq!(auth.user(), Some(&user));

    let all: Vec<User> = load_json(&store, keys::ALL_USERS).unwrap().unwrap();
    assert_eq!(all, vec![user.clone()]);

    auth.logout(&mut store).expect("logout");
    let again = auth
        .login(&mut store, "chai@example.com", "masala42")
        .expect("login after register");
    assert_eq!(again.id, user.id);
}

#[test]
fn register_rejects_taken_email_and_short_password() {
    let mut store = MemoryKvStore::new();
    let mut auth = demo_auth();

    let err = auth
        .register(&mut store, "imposter", "sarah@example.com", "longenough")
        .unwrap_err();
    assert!(matches!(err, AuthError::EmailTaken));
    assert_eq!(err.to_string(), "Email already exists");

    let err = auth
        .register(&mut store, "shorty", "short@example.com", "12345")
        .unwrap_err();
    assert!(matches!(err, AuthError::PasswordTooShort));
    assert_eq!(store.write_count(), 0);

    auth.register(&mut store, "first", "dup@example.com", "secret1").expect("first");
    let err = auth
        .register(&mut store, "second", "dup@example.com", "secret2")
        .unwrap_err();
    assert!(matches!(err, AuthError::EmailTaken));
}

#[test]
fn register_rolls_back_account_when_login_write_fails() {
    let mut store = RefusingStore {
        inner: MemoryKvStore::new(),
        refused: keys::CURRENT_USER,
    };
    let mut auth = demo_auth();

    let err = auth
        .register(&mut store, "chai_lover", "chai@example.com", "masala42")
        .unwrap_err();
    assert!(matches!(err, AuthError::Persist(_)));
    assert!(!auth.is_authenticated());
    assert_eq!(store.get(keys::ALL_USERS).unwrap(), None);

    store.refused = "";
    let user = auth
        .register(&mut store, "chai_lover", "chai@example.com", "masala42")
        .expect("retry");
    let all: Vec<User> = load_json(&store, keys::ALL_USERS).unwrap().unwrap();
    assert_eq!(all, vec![user]);
}

#[test]
fn register_rollback_keeps_earlier_accounts() {
    let mut store = MemoryKvStore::new();
    let mut auth = demo_auth();
    let first = auth
        .register(&mut store, "first", "first@example.com", "secret1")
        .expect("first");

    let mut store = RefusingStore {
        inner: store,
        refused: keys::CURRENT_USER,
    };
    auth.register(&mut store, "second", "second@example.com", "secret2")
        .unwrap_err();
    let all: Vec<User> = load_json(&store, keys::ALL_USERS).unwrap().unwrap();
    assert_eq!(all, vec![first]);
}

#[test]
fn sign_up_form_checks_run_in_order() {
    assert!(matches!(
        check_sign_up("u", "u@example.com", "secret1", ""),
        Err(AuthError::MissingFields)
    ));
    let err = check_sign_up("u", "u@example.com", "secret1", "secret2").unwrap_err();
    assert!(matches!(err, AuthError::PasswordMismatch));
    assert_eq!(err.to_string(), "Passwords do not match");
    assert!(matches!(
        check_sign_up("u", "u@example.com", "123", "456"),
        Err(AuthError::PasswordMismatch)
    ));
    assert!(matches!(
        check_sign_up("u", "u@example.com", "123", "123"),
        Err(AuthError::PasswordTooShort)
    ));
    assert!(check_sign_up("u", "u@example.com", "secret1", "secret1").is_ok());

    let mut session = Session::open(Box::new(MemoryKvStore::new()), SessionConfig::default()).expect("session");
    assert!(matches!(
        session.sign_up("u", "u@example.com", "secret1", "secret9"),
        Err(AuthError::PasswordMismatch)
    ));
    assert!(session.auth().user().is_none());
    let user = session
        .sign_up("u", "u@example.com", "secret1", "secret1")
        .expect("sign up");
    assert_eq!(session.auth().user(), Some(&user));
}

#[test]
fn logout_clears_user_and_city() {
    let mut store = MemoryKvStore::new();
    let mut auth = demo_auth();
    auth.login(&mut store, "sarah@example.com", "password123").expect("login");
    auth.select_city(&mut store, "Hyderabad").expect("city");
    assert_eq!(auth.selected_city(), Some("Hyderabad"));

    auth.logout(&mut store).expect("logout");
    assert!(!auth.is_authenticated());
    assert_eq!(auth.selected_city(), None);
    assert_eq!(store.get(keys::CURRENT_USER).unwrap(), None);
    assert_eq!(store.get(keys::SELECTED_CITY).unwrap(), None);
}

#[test]
fn restore_picks_up_persisted_user_and_city() {
    let mut store = MemoryKvStore::new();
    let user = User {
        id: "u9".to_string(),
        username: "returning".to_string(),
        email: "r@example.com".to_string(),
        password: "secret9".to_string(),
    };
    save_json(&mut store, keys::CURRENT_USER, &user).unwrap();
    save_json(&mut store, keys::SELECTED_CITY, "Pune").unwrap();

    let auth = AuthState::restore(&store, vec![]).expect("restore");
    assert_eq!(auth.user(), Some(&user));
    assert_eq!(auth.selected_city(), Some("Pune"));
}

#[test]
fn buddy_matches_require_login_and_track_status() {
    let mut session = Session::open(Box::new(MemoryKvStore::new()), SessionConfig::default()).expect("session");
    assert!(matches!(session.matches(), Err(SessionError::NotAuthenticated)));

    session.login("meetsaurabh@gmail.com", "helloworld").expect("login");
    let matches = session.matches().expect("matches");
    let match_ids: Vec<&str> = matches.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(match_ids, vec!["match1", "match2"]);

    let accepted = session.accept_match("match1").expect("accept");
    assert_eq!(accepted.status, MatchStatus::Accepted);
    assert!(matches!(
        session.reject_match("match1"),
        Err(SessionError::Buddy(BuddyError::AlreadyAnswered(_)))
    ));

    assert!(matches!(
        session.accept_match("nope"),
        Err(SessionError::Buddy(BuddyError::UnknownMatch(_)))
    ));
}

#[test]
fn buddy_answers_are_limited_to_own_pending_matches() {
    let mut session = Session::open(Box::new(MemoryKvStore::new()), SessionConfig::default()).expect("session");
    session.login("adam@example.com", "password123").expect("login");
    let match_ids: Vec<String> = session.matches().expect("matches").into_iter().map(|m| m.id).collect();
    assert_eq!(match_ids, vec!["match2", "match3", "match5"]);

    assert!(matches!(
        session.accept_match("match1"),
        Err(SessionError::Buddy(BuddyError::NotParticipant(_)))
    ));
    assert!(matches!(
        session.reject_match("match2"),
        Err(SessionError::Buddy(BuddyError::AlreadyAnswered(_)))
    ));

    let rejected = session.reject_match("match5").expect("reject");
    assert_eq!(rejected.status, MatchStatus::Rejected);

    let book = session.buddies();
    let untouched: Vec<_> = book.matches_for("user1");
    assert_eq!(untouched[0].status, MatchStatus::Pending);
}

#[test]
fn buddy_counterpart_and_preferences_resolve() {
    let book = BuddyBook::builtin().expect("buddies");
    let mine = book.matches_for("user3");
    assert_eq!(mine.len(), 3);

    let other = book.counterpart(mine[0], "user3").expect("counterpart");
    assert_eq!(other.id, "user1");
    let prefs = book.preferences(&other.id).expect("prefs");
    assert!(prefs.cuisine.contains(&"Indian".to_string()));
}
