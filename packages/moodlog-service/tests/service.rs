use std::{
	sync::{
		Arc, Mutex,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration,
};

use serde_json::{Map, Value};
use uuid::Uuid;

use moodlog_config::{
	Config, LlmProviderConfig, Postgres, Providers as ProviderConfigs, Security, Service, Storage,
};
use moodlog_service::{
	BoxFuture, ClassifyRequest, CompletionProvider, EntryRepository, Error, FilterCriteria,
	Identity, IdentitySource, IntensityBand, JournalEntry, JournalService, MemoryEntryRepository,
	MoodClassification, MoodFilter, NewJournalEntry, Providers, SessionEvent, SessionManager,
	SubmitEntryRequest,
};

type CallLog = Arc<Mutex<Vec<&'static str>>>;

enum Reply {
	Text(String),
	Fail,
}

struct StubCompletion {
	reply: Reply,
	calls: Arc<AtomicUsize>,
	prompts: Arc<Mutex<Vec<Value>>>,
	log: Option<CallLog>,
}
impl StubCompletion {
	fn text(reply: &str) -> Self {
		Self {
			reply: Reply::Text(reply.to_string()),
			calls: Arc::new(AtomicUsize::new(0)),
			prompts: Arc::new(Mutex::new(Vec::new())),
			log: None,
		}
	}

	fn failing() -> Self {
		Self { reply: Reply::Fail, ..Self::text("") }
	}

	fn logging(mut self, log: CallLog) -> Self {
		self.log = Some(log);

		self
	}
}
impl CompletionProvider for StubCompletion {
	fn complete<'a>(
		&'a self,
		_: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, moodlog_providers::Result<String>> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		self.prompts.lock().unwrap_or_else(|err| err.into_inner()).extend(messages.iter().cloned());

		if let Some(log) = &self.log {
			log.lock().unwrap_or_else(|err| err.into_inner()).push("classify");
		}

		let result = match &self.reply {
			Reply::Text(text) => Ok(text.clone()),
			Reply::Fail => Err(moodlog_providers::Error::InvalidResponse {
				message: "upstream unavailable".to_string(),
			}),
		};

		Box::pin(async move { result })
	}
}

struct RecordingIdentity {
	identity: Option<Identity>,
	log: CallLog,
}
impl IdentitySource for RecordingIdentity {
	fn current_user(&self) -> BoxFuture<'_, moodlog_service::Result<Option<Identity>>> {
		self.log.lock().unwrap_or_else(|err| err.into_inner()).push("identity");

		let identity = self.identity.clone();

		Box::pin(async move { Ok(identity) })
	}
}

struct RecordingRepository {
	inner: MemoryEntryRepository,
	log: CallLog,
}
impl EntryRepository for RecordingRepository {
	fn insert<'a>(&'a self, entry: NewJournalEntry) -> BoxFuture<'a, moodlog_service::Result<Uuid>> {
		self.log.lock().unwrap_or_else(|err| err.into_inner()).push("insert");

		self.inner.insert(entry)
	}

	fn query<'a>(
		&'a self,
		owner_id: Uuid,
		filter: &'a FilterCriteria,
	) -> BoxFuture<'a, moodlog_service::Result<Vec<JournalEntry>>> {
		self.inner.query(owner_id, filter)
	}
}

fn test_config() -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		storage: Storage {
			postgres: Postgres {
				dsn: "postgres://unused@127.0.0.1:1/unused".to_string(),
				pool_max_conns: 1,
			},
		},
		providers: ProviderConfigs {
			mood_classifier: LlmProviderConfig {
				provider_id: "stub".to_string(),
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "stub-key".to_string(),
				path: "/v1/chat/completions".to_string(),
				model: "gpt-3.5-turbo".to_string(),
				temperature: 0.0,
				max_tokens: 10,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
		},
		security: Security::default(),
	}
}

fn service_with(completion: StubCompletion) -> (JournalService, Arc<MemoryEntryRepository>) {
	let repository = Arc::new(MemoryEntryRepository::new());
	let service = JournalService::with_providers(
		test_config(),
		repository.clone(),
		Providers::new(Arc::new(completion)),
	);

	(service, repository)
}

fn signed_in() -> SessionManager {
	let session = SessionManager::new();

	session.sign_in(Identity { user_id: Uuid::new_v4(), email: Some("a@b.c".to_string()) });

	session
}

async fn classify_reply(reply: &str) -> MoodClassification {
	let (service, _) = service_with(StubCompletion::text(reply));

	service.classify("Some entry.").await
}

#[tokio::test]
async fn classify_maps_model_replies() {
	let cases = [
		("happy 8", "happy", 8),
		("HAPPY 8", "happy", 8),
		("  sad   3 \n", "sad", 3),
		("fearful 10", "fearful", 10),
		("angry 0", "angry", 0),
		("happy 12", "happy", 10),
		("melancholic 6", "melancholic", 6),
		("surprised", "neutral", 5),
		("42 happy", "neutral", 5),
		("happy 8.", "neutral", 5),
		("I feel happy 8", "neutral", 5),
		("happy 100", "neutral", 5),
		("", "neutral", 5),
	];

	for (reply, mood, intensity) in cases {
		let classification = classify_reply(reply).await;

		assert_eq!(
			classification,
			MoodClassification { mood: mood.to_string(), intensity },
			"reply {reply:?}"
		);
	}
}

#[tokio::test]
async fn classify_falls_back_on_provider_error() {
	let (service, _) = service_with(StubCompletion::failing());

	assert_eq!(service.classify("Anything.").await, MoodClassification::fallback());
}

#[tokio::test]
async fn classify_sends_one_prompt_per_call_and_is_stable() {
	let completion = StubCompletion::text("calm 4");
	let calls = completion.calls.clone();
	let prompts = completion.prompts.clone();
	let (service, _) = service_with(completion);
	let first = service.classify("Quiet evening.").await;
	let second =
		service.classify_entry(ClassifyRequest { content: "Quiet evening.".to_string() }).await;

	assert_eq!(first, second);
	assert_eq!(calls.load(Ordering::SeqCst), 2);

	let prompts = prompts.lock().unwrap_or_else(|err| err.into_inner());

	assert_eq!(prompts.len(), 2);
	assert_eq!(prompts[0]["role"], "user");
	assert!(
		prompts[0]["content"]
			.as_str()
			.is_some_and(|text| text.ends_with("Entry:\nQuiet evening."))
	);
}

#[tokio::test]
async fn submit_classifies_before_identity_then_inserts() {
	let log: CallLog = Arc::new(Mutex::new(Vec::new()));
	let identity = Identity { user_id: Uuid::new_v4(), email: None };
	let repository =
		Arc::new(RecordingRepository { inner: MemoryEntryRepository::new(), log: log.clone() });
	let service = JournalService::with_providers(
		test_config(),
		repository.clone(),
		Providers::new(Arc::new(StubCompletion::text("happy 8").logging(log.clone()))),
	);
	let session = RecordingIdentity { identity: Some(identity.clone()), log: log.clone() };
	let response = service
		.submit_entry(
			&session,
			SubmitEntryRequest { content: "Great day at the beach.".to_string() },
		)
		.await
		.expect("Submit failed.");

	assert_eq!(response.mood, "happy");
	assert_eq!(response.intensity, 8);
	assert_eq!(
		*log.lock().unwrap_or_else(|err| err.into_inner()),
		["classify", "identity", "insert"]
	);

	let stored = repository
		.inner
		.query(identity.user_id, &FilterCriteria::default())
		.await
		.expect("Query failed.");

	assert_eq!(stored.len(), 1);
	assert_eq!(stored[0].entry_id, response.entry_id);
	assert_eq!(stored[0].content, "Great day at the beach.");
	assert_eq!(stored[0].intensity, 8);
}

#[tokio::test]
async fn submit_without_user_classifies_but_stores_nothing() {
	let log: CallLog = Arc::new(Mutex::new(Vec::new()));
	let completion = StubCompletion::text("sad 2");
	let calls = completion.calls.clone();
	let (service, repository) = service_with(completion);
	let session = RecordingIdentity { identity: None, log };
	let err = service
		.submit_entry(&session, SubmitEntryRequest { content: "Rainy.".to_string() })
		.await
		.expect_err("Expected unauthenticated error.");

	match err {
		Error::Unauthenticated { message } => assert_eq!(message, "User not found."),
		other => panic!("Unexpected error: {other:?}"),
	}

	assert_eq!(calls.load(Ordering::SeqCst), 1);
	assert!(repository.is_empty());
}

#[tokio::test]
async fn submit_rejects_blank_content_without_calling_the_model() {
	let completion = StubCompletion::text("happy 8");
	let calls = completion.calls.clone();
	let (service, repository) = service_with(completion);
	let session = signed_in();
	let err = service
		.submit_entry(&session, SubmitEntryRequest { content: "  \n\t".to_string() })
		.await
		.expect_err("Expected invalid request.");

	assert!(matches!(err, Error::InvalidRequest { .. }));
	assert_eq!(calls.load(Ordering::SeqCst), 0);
	assert!(repository.is_empty());
}

#[tokio::test]
async fn submit_persists_fallback_when_model_fails() {
	let (service, _) = service_with(StubCompletion::failing());
	let session = signed_in();
	let response = service
		.submit_entry(&session, SubmitEntryRequest { content: "Hard to say.".to_string() })
		.await
		.expect("Submit failed.");

	assert_eq!((response.mood.as_str(), response.intensity), ("neutral", 5));

	let listed =
		service.list_entries(&session, FilterCriteria::default()).await.expect("List failed.");

	assert_eq!(listed.items.len(), 1);
	assert_eq!(listed.items[0].mood, "neutral");
}

#[tokio::test]
async fn list_applies_filters_and_orders_newest_first() {
	let repository = Arc::new(MemoryEntryRepository::new());
	let session = signed_in();
	let owner = session.current_user().expect("Expected identity.").user_id;
	let stranger = Uuid::new_v4();
	let service = JournalService::with_providers(
		test_config(),
		repository.clone(),
		Providers::new(Arc::new(StubCompletion::text("happy 8"))),
	);

	for (owner_id, mood, intensity) in
		[(owner, "happy", 8), (owner, "sad", 2), (stranger, "happy", 9), (owner, "happy", 5)]
	{
		repository
			.insert(NewJournalEntry {
				owner_id,
				content: format!("{mood} {intensity}"),
				mood: mood.to_string(),
				intensity,
			})
			.await
			.expect("Insert failed.");

		tokio::time::sleep(Duration::from_millis(2)).await;
	}

	let all =
		service.list_entries(&session, FilterCriteria::default()).await.expect("List failed.");
	let contents = all.items.iter().map(|item| item.content.as_str()).collect::<Vec<_>>();

	assert_eq!(contents, ["happy 5", "sad 2", "happy 8"]);

	let mut filter = FilterCriteria { mood: MoodFilter::parse("happy"), ..Default::default() };

	filter.toggle_band(IntensityBand::High);

	let high = service.list_entries(&session, filter).await.expect("List failed.");
	let contents = high.items.iter().map(|item| item.content.as_str()).collect::<Vec<_>>();

	assert_eq!(contents, ["happy 8"]);

	let surprised = FilterCriteria { mood: MoodFilter::parse("surprised"), ..Default::default() };
	let none = service.list_entries(&session, surprised).await.expect("List failed.");

	assert!(none.items.is_empty());
}

#[tokio::test]
async fn list_rejects_inverted_range_and_requires_user() {
	let (service, _) = service_with(StubCompletion::text("happy 8"));
	let session = signed_in();
	let inverted = FilterCriteria { mood: MoodFilter::All, min_intensity: 8, max_intensity: 2 };
	let err =
		service.list_entries(&session, inverted).await.expect_err("Expected invalid filter.");

	assert!(matches!(err, Error::InvalidRequest { .. }));

	let anonymous = SessionManager::new();
	let err = service
		.list_entries(&anonymous, FilterCriteria::default())
		.await
		.expect_err("Expected unauthenticated error.");

	assert!(matches!(err, Error::Unauthenticated { .. }));
}

#[tokio::test]
async fn session_announces_sign_in_and_sign_out() {
	let session = SessionManager::new();
	let mut events = session.on_change();
	let identity = Identity { user_id: Uuid::new_v4(), email: None };

	assert!(!session.sign_out());

	session.sign_in(identity.clone());

	assert_eq!(
		IdentitySource::current_user(&session).await.expect("Identity lookup failed."),
		Some(identity.clone())
	);
	assert!(session.sign_out());
	assert_eq!(session.current_user(), None);
	assert_eq!(events.recv().await.expect("Missing event."), SessionEvent::SignedIn(identity));
	assert_eq!(events.recv().await.expect("Missing event."), SessionEvent::SignedOut);
	assert!(events.try_recv().is_err());
}
