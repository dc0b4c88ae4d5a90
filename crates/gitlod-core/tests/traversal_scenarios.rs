//! # Traversal Scenario Tests (T0-T4)
//!
//! End-to-end emission over an in-memory source.
//!
//! ## Tiers
//! - T0: Subjects
//! - T1: Summary Mode
//! - T2: Full Mode (one hop, reverse edges, cycles)
//! - T3: Association Caching
//! - T4: Remote Failures

use gitlod_core::vocab::{dc, doap, foaf, rdf};
use gitlod_core::{
    Account, Entity, FailurePolicy, GitlodError, Iri, MemorySource, Mode, Person, Project,
    RepoRecord, Repository, SharedSource, SubjectId, Term, Traversal, Triple, UserRecord, collect,
};
use std::sync::Arc;

// =============================================================================
// FIXTURES
// =============================================================================

fn user(login: &str, name: &str) -> UserRecord {
    UserRecord {
        login: login.to_string(),
        name: Some(name.to_string()),
        populated: true,
        ..UserRecord::default()
    }
}

fn repo(owner: &UserRecord, name: &str) -> RepoRecord {
    RepoRecord {
        owner: owner.clone(),
        name: name.to_string(),
        url: Some(format!("https://github.com/{}/{}", owner.login, name)),
        populated: true,
        ..RepoRecord::default()
    }
}

/// alice and bob follow each other; alice owns `rdf`.
fn mutual() -> Arc<MemorySource> {
    let memory = Arc::new(MemorySource::new());
    let alice = user("alice", "Alice");
    memory.insert_user(alice.clone()).expect("insert");
    memory.insert_user(user("bob", "Bob")).expect("insert");
    memory.insert_repo(repo(&alice, "rdf")).expect("insert");
    memory
        .set_followings("alice", vec!["bob".to_string()])
        .expect("set");
    memory
        .set_followers("alice", vec!["bob".to_string()])
        .expect("set");
    memory
        .set_followings("bob", vec!["alice".to_string()])
        .expect("set");
    memory
        .set_followers("bob", vec!["alice".to_string()])
        .expect("set");
    memory
}

fn shared(memory: &Arc<MemorySource>) -> SharedSource {
    memory.clone()
}

fn t(subject: SubjectId, predicate: &str, object: impl Into<Term>) -> Triple {
    Triple::new(subject, Iri::new(predicate), object)
}

fn person_node(login: &str) -> SubjectId {
    SubjectId::blank(&format!("user-{}", login))
}

fn account_iri(login: &str) -> SubjectId {
    SubjectId::iri(format!("http://github.com/{}", login))
}

// =============================================================================
// TIER T0: SUBJECTS
// =============================================================================

mod t0_subjects {
    use super::*;

    /// T0.1: An entity without a subject emits nothing in either mode.
    #[test]
    fn undefined_subject_emits_nothing() {
        let owner = user("alice", "Alice");
        let record = RepoRecord {
            owner,
            name: "scratch".to_string(),
            ..RepoRecord::default()
        };
        let mut repository = Repository::new(Arc::new(MemorySource::new()), record);

        assert!(collect(&mut repository, Mode::Summary).expect("emit").is_empty());
        assert!(collect(&mut repository, Mode::Full).expect("emit").is_empty());
    }

    /// T0.2: Blank nodes are a pure function of the sanitized seed.
    #[test]
    fn blank_nodes_are_deterministic() {
        let source: SharedSource = Arc::new(MemorySource::new());
        let a = Person::new(source.clone(), UserRecord::stub("john doe"));
        let b = Person::new(source, UserRecord::stub("john.doe"));
        assert_eq!(a.subject(), b.subject());
        assert_eq!(a.subject(), Some(&SubjectId::blank("user-john_doe")));
    }

    /// T0.3: A target without a subject is dropped from reference lists.
    #[test]
    fn subjectless_target_is_not_an_edge() {
        let memory = Arc::new(MemorySource::new());
        let alice = user("alice", "Alice");
        memory.insert_user(alice.clone()).expect("insert");
        let mut draft = repo(&alice, "draft");
        draft.url = None;

        let mut project = Project::new(shared(&memory), draft);
        let triples = collect(&mut project, Mode::Full).expect("emit");
        assert!(
            triples
                .iter()
                .all(|t| t.predicate.as_str() != doap::REPOSITORY)
        );
    }
}

// =============================================================================
// TIER T1: SUMMARY MODE
// =============================================================================

mod t1_summary {
    use super::*;

    /// T1.1: Summary output is exactly the summary properties, in order.
    #[test]
    fn person_summary_is_exact() {
        let memory = Arc::new(MemorySource::new());
        let mut person = Person::new(shared(&memory), user("u", "U"));

        let triples = collect(&mut person, Mode::Summary).expect("emit");
        assert_eq!(
            triples,
            vec![
                t(person_node("u"), rdf::TYPE, Term::iri(foaf::PERSON)),
                t(person_node("u"), foaf::NAME, Term::literal("U")),
                t(person_node("u"), foaf::NICK, Term::literal("u")),
            ]
        );
    }

    /// T1.2: Summary mode never touches the source.
    #[test]
    fn summary_performs_no_io() {
        let memory = mutual();
        let mut person = Person::get(shared(&memory), "alice").expect("get");
        collect(&mut person, Mode::Summary).expect("emit");
        assert_eq!(memory.list_calls(), 0);
        assert_eq!(memory.fetch_calls(), 0);
    }

    /// T1.3: The sha1 mailbox sum is a summary field.
    #[test]
    fn mbox_sha1sum_in_summary() {
        let mut record = user("alice", "Alice");
        record.email = Some("alice@example.org".to_string());
        let mut person = Person::new(Arc::new(MemorySource::new()), record);

        let triples = collect(&mut person, Mode::Summary).expect("emit");
        assert_eq!(triples.len(), 4);
        assert_eq!(triples[3].predicate.as_str(), foaf::MBOX_SHA1SUM);
        assert!(
            triples
                .iter()
                .all(|t| t.predicate.as_str() != foaf::MBOX)
        );
    }

    /// T1.4: A non-summary field is dropped from summary output.
    #[test]
    fn location_is_not_a_summary_field() {
        let mut record = user("u", "Alice");
        record.location = Some("NYC".to_string());
        let mut person = Person::new(Arc::new(MemorySource::new()), record);

        let triples = collect(&mut person, Mode::Summary).expect("emit");
        assert_eq!(
            triples,
            vec![
                t(person_node("u"), rdf::TYPE, Term::iri(foaf::PERSON)),
                t(person_node("u"), foaf::NAME, Term::literal("Alice")),
                t(person_node("u"), foaf::NICK, Term::literal("u")),
            ]
        );
        assert!(
            triples
                .iter()
                .all(|t| t.predicate.as_str() != foaf::BASED_NEAR)
        );
    }
}

// =============================================================================
// TIER T2: FULL MODE
// =============================================================================

mod t2_full {
    use super::*;

    /// T2.1: Person U with account A and nothing else.
    #[test]
    fn person_with_account() {
        let memory = Arc::new(MemorySource::new());
        memory.insert_user(user("u", "U")).expect("insert");
        let mut person = Person::get(shared(&memory), "u").expect("get");

        let triples = collect(&mut person, Mode::Full).expect("emit");
        assert_eq!(
            triples,
            vec![
                t(person_node("u"), rdf::TYPE, Term::iri(foaf::PERSON)),
                t(person_node("u"), foaf::NAME, Term::literal("U")),
                t(person_node("u"), foaf::NICK, Term::literal("u")),
                t(person_node("u"), foaf::ACCOUNT, account_iri("u")),
                t(account_iri("u"), rdf::TYPE, Term::iri(foaf::ONLINE_ACCOUNT)),
                t(account_iri("u"), foaf::NAME, Term::literal("GitHub")),
                t(account_iri("u"), foaf::ACCOUNT_NAME, Term::literal("u")),
            ]
        );
    }

    /// T2.2: Full output adds the non-summary field before the account edge.
    #[test]
    fn location_precedes_account_edge() {
        let memory = Arc::new(MemorySource::new());
        let mut record = user("u", "Alice");
        record.location = Some("NYC".to_string());
        memory.insert_user(record).expect("insert");
        let mut person = Person::get(shared(&memory), "u").expect("get");

        let triples = collect(&mut person, Mode::Full).expect("emit");
        assert_eq!(
            triples,
            vec![
                t(person_node("u"), rdf::TYPE, Term::iri(foaf::PERSON)),
                t(person_node("u"), foaf::NAME, Term::literal("Alice")),
                t(person_node("u"), foaf::NICK, Term::literal("u")),
                t(person_node("u"), foaf::BASED_NEAR, Term::literal("NYC")),
                t(person_node("u"), foaf::ACCOUNT, account_iri("u")),
                t(account_iri("u"), rdf::TYPE, Term::iri(foaf::ONLINE_ACCOUNT)),
                t(account_iri("u"), foaf::NAME, Term::literal("GitHub")),
                t(account_iri("u"), foaf::ACCOUNT_NAME, Term::literal("u")),
            ]
        );
    }

    /// T2.3: Reverse references swap subject and object.
    #[test]
    fn account_links_back_to_person() {
        let memory = Arc::new(MemorySource::new());
        let mut account = Account::new(shared(&memory), user("u", "U"));

        let triples = collect(&mut account, Mode::Full).expect("emit");
        let edge = t(person_node("u"), foaf::ACCOUNT, account_iri("u"));
        let position = triples.iter().position(|x| *x == edge).expect("edge");

        // Edge, then the person's summary, and nothing after it
        assert_eq!(triples.len(), position + 4);
        assert_eq!(triples[position + 1].subject, person_node("u"));
        assert!(
            triples
                .iter()
                .any(|x| x.predicate.as_str() == foaf::ACCOUNT_SERVICE_HOMEPAGE)
        );
    }

    /// T2.4: Mutual follows terminate with one edge each way plus summaries.
    #[test]
    fn cyclic_follows_terminate() {
        let memory = mutual();
        let mut alice = Person::get(shared(&memory), "alice").expect("get");

        let triples = collect(&mut alice, Mode::Full).expect("emit");

        let forward = t(person_node("alice"), foaf::KNOWS, person_node("bob"));
        let reverse = t(person_node("bob"), foaf::KNOWS, person_node("alice"));
        assert_eq!(triples.iter().filter(|x| **x == forward).count(), 1);
        assert_eq!(triples.iter().filter(|x| **x == reverse).count(), 1);

        // bob's summary appears once per edge and bob's own edges never do
        let bob_nicks = triples
            .iter()
            .filter(|x| {
                x.subject == person_node("bob") && x.predicate.as_str() == foaf::NICK
            })
            .count();
        assert_eq!(bob_nicks, 2);
        assert!(
            !triples
                .iter()
                .any(|x| x.subject == person_node("bob") && x.predicate.as_str() == foaf::ACCOUNT)
        );
    }

    /// T2.5: Every edge is immediately followed by its target's summary.
    #[test]
    fn edge_then_summary_order() {
        let memory = mutual();
        let mut alice = Person::get(shared(&memory), "alice").expect("get");
        let triples = collect(&mut alice, Mode::Full).expect("emit");

        let forward = t(person_node("alice"), foaf::KNOWS, person_node("bob"));
        let at = triples.iter().position(|x| *x == forward).expect("edge");
        assert_eq!(
            triples[at + 1],
            t(person_node("bob"), rdf::TYPE, Term::iri(foaf::PERSON))
        );
    }

    /// T2.6: Projects link to their owner and repository.
    #[test]
    fn project_full() {
        let memory = mutual();
        let mut project = Project::get(shared(&memory), "alice", "rdf").expect("get");
        let triples = collect(&mut project, Mode::Full).expect("emit");

        let node = SubjectId::blank("proj-alice-rdf");
        let url = SubjectId::iri("https://github.com/alice/rdf");
        assert!(triples.contains(&t(node.clone(), dc::CREATOR, person_node("alice"))));
        assert!(triples.contains(&t(node, doap::REPOSITORY, url.clone())));
        assert!(triples.contains(&t(url.clone(), doap::BROWSE, url)));
    }

    /// T2.7: A repository points back at its project.
    #[test]
    fn repository_full() {
        let memory = mutual();
        let mut repository = Repository::get(shared(&memory), "alice", "rdf").expect("get");
        let triples = collect(&mut repository, Mode::Full).expect("emit");

        let url = SubjectId::iri("https://github.com/alice/rdf");
        let node = SubjectId::blank("proj-alice-rdf");
        assert_eq!(triples[0], t(url.clone(), rdf::TYPE, Term::iri(doap::GIT_REPOSITORY)));
        assert!(triples.contains(&t(node.clone(), doap::REPOSITORY, url)));
        assert!(triples.contains(&t(node, doap::NAME, Term::literal("rdf"))));
    }

    /// T2.8: Projects of a person come from its repos.
    #[test]
    fn person_develops_projects() {
        let memory = mutual();
        let mut alice = Person::get(shared(&memory), "alice").expect("get");
        let triples = collect(&mut alice, Mode::Full).expect("emit");
        assert!(triples.contains(&t(
            person_node("alice"),
            foaf::DEVELOPER,
            SubjectId::blank("proj-alice-rdf")
        )));
    }
}

// =============================================================================
// TIER T3: ASSOCIATION CACHING
// =============================================================================

mod t3_caching {
    use super::*;

    /// T3.1: Associations load once per instance.
    #[test]
    fn second_emission_is_cached() {
        let memory = mutual();
        let mut alice = Person::get(shared(&memory), "alice").expect("get");

        collect(&mut alice, Mode::Full).expect("emit");
        let calls = memory.list_calls();
        collect(&mut alice, Mode::Full).expect("emit");
        assert_eq!(memory.list_calls(), calls);
    }

    /// T3.2: sync() drops cached associations.
    #[test]
    fn sync_invalidates() {
        let memory = mutual();
        memory.insert_user(user("carol", "Carol")).expect("insert");
        let mut alice = Person::get(shared(&memory), "alice").expect("get");

        assert_eq!(alice.followers().expect("load").len(), 1);
        memory
            .set_followers("alice", vec!["bob".to_string(), "carol".to_string()])
            .expect("set");
        assert_eq!(alice.followers().expect("load").len(), 1);

        alice.sync().expect("sync");
        assert_eq!(alice.followers().expect("load").len(), 2);
    }

    /// T3.3: warm() resolves everything so emission needs no I/O.
    #[test]
    fn warm_then_emit_without_io() {
        let memory = mutual();
        let mut alice = Person::get(shared(&memory), "alice").expect("get");

        let report = Traversal::new().warm(&mut alice).expect("warm");
        assert!(report.is_complete());
        assert_eq!(report.triples, 0);

        let calls = memory.list_calls();
        let triples = collect(&mut alice, Mode::Full).expect("emit");
        assert!(!triples.is_empty());
        assert_eq!(memory.list_calls(), calls);
    }

    /// T3.4: fetch() syncs an unpopulated record once.
    #[test]
    fn fetch_populates_stub() {
        let memory = mutual();
        let mut person = Person::new(shared(&memory), UserRecord::stub("bob"));

        person.fetch().expect("fetch");
        assert_eq!(person.name(), Some("Bob"));
        assert!(person.record().populated);
        assert_eq!(memory.fetch_calls(), 1);
    }

    /// T3.5: fetch() on a populated record asks for empty lists only.
    #[test]
    fn fetch_requests_empty_lists() {
        let memory = mutual();
        let mut bob = Person::get(shared(&memory), "bob").expect("get");

        // bob owns no repos
        bob.fetch().expect("fetch");
        assert_eq!(memory.fetch_calls(), 1);

        let mut alice = Person::get(shared(&memory), "alice").expect("get");
        alice.fetch().expect("fetch");
        assert_eq!(memory.fetch_calls(), 1);
    }
}

// =============================================================================
// TIER T4: REMOTE FAILURES
// =============================================================================

mod t4_failures {
    use super::*;

    /// T4.1: The default policy propagates the failure.
    #[test]
    fn abort_propagates() {
        let memory = mutual();
        let mut alice = Person::get(shared(&memory), "alice").expect("get");
        memory.set_unreachable("alice", true).expect("set");

        let result = collect(&mut alice, Mode::Full);
        assert!(matches!(result, Err(GitlodError::RemoteFetchError(_))));
    }

    /// T4.2: Skip drops failed references and reports them.
    #[test]
    fn skip_reports_failed_edges() {
        let memory = mutual();
        let mut alice = Person::get(shared(&memory), "alice").expect("get");
        memory.set_unreachable("alice", true).expect("set");

        let mut triples: Vec<Triple> = Vec::new();
        let report = Traversal::new()
            .on_failure(FailurePolicy::Skip)
            .emit(&mut alice, Mode::Full, &mut triples)
            .expect("emit");

        let failed: Vec<_> = report.failed.iter().map(|f| f.reference).collect();
        assert_eq!(failed, vec!["followings", "followers", "projects"]);
        assert_eq!(report.triples, triples.len());
        // Properties and the account survive
        assert!(triples.contains(&t(person_node("alice"), foaf::ACCOUNT, account_iri("alice"))));
    }

    /// T4.3: A failed load leaves the cache empty, so a retry can succeed.
    #[test]
    fn failure_keeps_cache_absent() {
        let memory = mutual();
        let mut alice = Person::get(shared(&memory), "alice").expect("get");

        memory.set_unreachable("alice", true).expect("set");
        assert!(alice.followers().is_err());
        memory.set_unreachable("alice", false).expect("set");
        assert_eq!(alice.followers().expect("load").len(), 1);
    }

    /// T4.4: Looking up an unknown login surfaces RecordNotFound.
    #[test]
    fn unknown_login() {
        let memory = mutual();
        assert!(matches!(
            Person::get(shared(&memory), "nobody"),
            Err(GitlodError::RecordNotFound(_))
        ));
    }
}
