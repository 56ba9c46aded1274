use hypermatch_common::*;
use hypermatch_subgraph::test_support::{StoreFixture, setup_test_logging};
use hypermatch_subgraph::*;
use rstest::rstest;

type Table = &'static [(&'static str, &'static str)];

/// A query graph `Q` and a target graph `T` given as name tables.
struct Scenario {
    query_nodes: Table,
    query_edges: Table,
    target_nodes: Table,
    target_edges: Table,
}

impl Scenario {
    fn store(&self) -> StoreFixture {
        StoreFixture::new()
            .graph("Q", self.query_nodes, self.query_edges)
            .graph("T", self.target_nodes, self.target_edges)
    }
}

lazy_static::lazy_static! {
    static ref TRIANGLE: Scenario = Scenario {
        query_nodes: &[("a", "A"), ("b", "B"), ("c", "C")],
        query_edges: &[("a", "b"), ("b", "c"), ("c", "a")],
        target_nodes: &[("x", "A"), ("y", "B"), ("z", "C")],
        target_edges: &[("x", "y"), ("y", "z"), ("z", "x")],
    };

    /// One edge against a star whose three leaves are twins.
    static ref STAR: Scenario = Scenario {
        query_nodes: &[("leaf", "A"), ("hub", "C")],
        query_edges: &[("leaf", "hub")],
        target_nodes: &[("c", "C"), ("l1", "A"), ("l2", "A"), ("l3", "A")],
        target_edges: &[("c", "l1"), ("c", "l2"), ("c", "l3")],
    };

    /// An edge against nested neighborhoods: hub sees p1 and p2, mid only p1.
    static ref NESTED: Scenario = Scenario {
        query_nodes: &[("a", "A"), ("p", "P")],
        query_edges: &[("a", "p")],
        target_nodes: &[("hub", "A"), ("mid", "A"), ("p1", "P"), ("p2", "P")],
        target_edges: &[("hub", "p1"), ("hub", "p2"), ("mid", "p1")],
    };

    /// Two equal labels on a path whose middle also touches a foreign label.
    static ref FOLLOWER_PAIR: Scenario = Scenario {
        query_nodes: &[("u", "A"), ("w", "A")],
        query_edges: &[("u", "w")],
        target_nodes: &[("x", "A"), ("y", "A"), ("z", "Z")],
        target_edges: &[("x", "y"), ("x", "z")],
    };

    /// Adjacent twins x and y closing a triangle with z.
    static ref TWIN_TRIANGLE: Scenario = Scenario {
        query_nodes: &[("u", "A"), ("w", "A")],
        query_edges: &[("u", "w")],
        target_nodes: &[("x", "A"), ("y", "A"), ("z", "B")],
        target_edges: &[("x", "y"), ("y", "z"), ("z", "x")],
    };

    /// A query edge given twice against a single target edge.
    static ref DOUBLED_EDGE: Scenario = Scenario {
        query_nodes: &[("u", "A"), ("w", "B")],
        query_edges: &[("u", "w"), ("w", "u")],
        target_nodes: &[("x", "A"), ("y", "B")],
        target_edges: &[("x", "y")],
    };

    static ref EMPTY_TARGET: Scenario = Scenario {
        query_nodes: &[("x", "X")],
        query_edges: &[],
        target_nodes: &[("a", "A"), ("b", "B")],
        target_edges: &[("a", "b")],
    };
}

fn run(scenario: &Scenario, config: &Config) -> (StoreFixture, MatchOutcome) {
    setup_test_logging();
    let f = scenario.store();
    let outcome = match_graphs(&f.store, &Label::new("Q"), &Label::new("T"), config, None).unwrap();
    (f, outcome)
}

/// Every embedding is injective, covers every query node and maps each
/// query edge onto a target edge.
#[track_caller]
fn assert_valid(f: &StoreFixture, outcome: &MatchOutcome) {
    let (q, t) = (f.index("Q"), f.index("T"));
    for embedding in outcome.embeddings() {
        assert_eq!(embedding.len(), q.num_nodes());
        let map: HashMap<NodeId, NodeId> = embedding.iter().copied().collect();
        let used: HashSet<NodeId> = map.values().copied().collect();
        assert_eq!(used.len(), map.len(), "not injective: {embedding:?}");
        for a in q.nodes() {
            for &b in q.neighbors(a) {
                let ta = t.resolve(map[&q.node_id(a)]).unwrap();
                let tb = t.resolve(map[&q.node_id(b)]).unwrap();
                assert!(t.has_edge(ta, tb), "edge lost in {embedding:?}");
            }
        }
    }
}

fn policy(search: SearchPolicy) -> Config {
    Config::builder().search_policy(search).build()
}

#[rstest]
#[case::triangle_plain(&TRIANGLE, SearchPolicy::Plain, 1)]
#[case::triangle_explode(&TRIANGLE, SearchPolicy::ExplodeEquivalents, 1)]
#[case::triangle_boost(&TRIANGLE, SearchPolicy::Boost, 1)]
#[case::star_plain(&STAR, SearchPolicy::Plain, 3)]
#[case::star_explode(&STAR, SearchPolicy::ExplodeEquivalents, 3)]
#[case::star_boost(&STAR, SearchPolicy::Boost, 3)]
#[case::nested_plain(&NESTED, SearchPolicy::Plain, 3)]
#[case::nested_boost(&NESTED, SearchPolicy::Boost, 3)]
#[case::follower_pair_plain(&FOLLOWER_PAIR, SearchPolicy::Plain, 2)]
#[case::follower_pair_explode(&FOLLOWER_PAIR, SearchPolicy::ExplodeEquivalents, 2)]
#[case::follower_pair_boost(&FOLLOWER_PAIR, SearchPolicy::Boost, 2)]
#[case::twin_triangle_plain(&TWIN_TRIANGLE, SearchPolicy::Plain, 2)]
#[case::twin_triangle_explode(&TWIN_TRIANGLE, SearchPolicy::ExplodeEquivalents, 2)]
#[case::twin_triangle_boost(&TWIN_TRIANGLE, SearchPolicy::Boost, 2)]
fn embedding_counts(#[case] scenario: &Scenario, #[case] search: SearchPolicy, #[case] expected: usize) {
    let (f, outcome) = run(scenario, &policy(search));
    assert_eq!(outcome.len(), expected);
    assert!(!outcome.cap_reached());
    assert_valid(&f, &outcome);
}

#[rstest]
fn swapped_twins_are_both_reported(
    #[values(SearchPolicy::Plain, SearchPolicy::ExplodeEquivalents, SearchPolicy::Boost)] search: SearchPolicy,
    #[values(DomainPolicy::LabelUnion, DomainPolicy::ProfileDominance)] domain: DomainPolicy,
) {
    let config = Config::builder().search_policy(search).domain_policy(domain).build();
    let (f, outcome) = run(&TWIN_TRIANGLE, &config);
    let (u, w, x, y) = (f.id("Q", "u"), f.id("Q", "w"), f.id("T", "x"), f.id("T", "y"));
    let found: HashSet<Embedding> = outcome.embeddings().iter().cloned().collect();
    let mut forward = vec![(u, x), (w, y)];
    let mut backward = vec![(u, y), (w, x)];
    forward.sort_unstable();
    backward.sort_unstable();
    assert_eq!(found, HashSet::from_iter([forward, backward]));
}

#[rstest]
#[case::naive(DomainPolicy::LabelUnion)]
#[case::graphql(DomainPolicy::ProfileDominance)]
fn repeated_query_edge_counts_one_neighbor(#[case] domain: DomainPolicy) {
    let config = Config::builder().domain_policy(domain).build();
    let (f, outcome) = run(&DOUBLED_EDGE, &config);
    assert_eq!(outcome.len(), 1);
    assert_valid(&f, &outcome);
}

#[test]
fn triangle_embedding_pairs_every_node() {
    let (f, outcome) = run(&TRIANGLE, &Config::default());
    assert_eq!(
        outcome.embeddings(),
        &[vec![
            (f.id("Q", "a"), f.id("T", "x")),
            (f.id("Q", "b"), f.id("T", "y")),
            (f.id("Q", "c"), f.id("T", "z")),
        ]]
    );
}

#[rstest]
#[case::plain(SearchPolicy::Plain)]
#[case::explode(SearchPolicy::ExplodeEquivalents)]
#[case::boost(SearchPolicy::Boost)]
fn empty_target_gives_no_solutions(#[case] search: SearchPolicy) {
    let (f, outcome) = run(&EMPTY_TARGET, &policy(search));
    match outcome {
        MatchOutcome::NoSolutions(NoSolutionReason::EmptyDomain { query_node }) => {
            assert_eq!(query_node, f.id("Q", "x"));
        }
        other => panic!("expected an empty domain, got {other:?}"),
    }
}

#[rstest]
#[case::plain(SearchPolicy::Plain)]
#[case::explode(SearchPolicy::ExplodeEquivalents)]
#[case::boost(SearchPolicy::Boost)]
fn cap_is_respected(#[case] search: SearchPolicy, #[values(0, 1, 2)] cap: usize) {
    let config = Config::builder().search_policy(search).solution_cap(cap).build();
    let (f, outcome) = run(&STAR, &config);
    assert_eq!(outcome.len(), cap);
    assert!(outcome.cap_reached());
    assert_valid(&f, &outcome);
}

#[test]
fn twins_collapse_into_one_representative() {
    setup_test_logging();
    let f = StoreFixture::new().graph(
        "T",
        &[("x", "A"), ("y", "A"), ("z", "B")],
        &[("x", "y"), ("x", "z"), ("y", "z")],
    );
    let cg = build_adapted_graph(&f.store, &Label::new("T"), &Config::default()).unwrap();
    let index = f.index("T");
    let (x, y) = (
        index.resolve(f.id("T", "x")).unwrap(),
        index.resolve(f.id("T", "y")).unwrap(),
    );
    let (rep, twin) = if cg.is_hidden(y) { (x, y) } else { (y, x) };
    assert!(cg.is_hidden(twin));
    assert!(!cg.is_hidden(rep));
    assert_eq!(cg.sec(rep), &[twin]);
}

#[test]
fn profile_dominance_prunes_weak_candidates() {
    // The query hub needs two A neighbors; weak has one, strong has two.
    let f = StoreFixture::new()
        .graph("Q", &[("h", "C"), ("a1", "A"), ("a2", "A")], &[("h", "a1"), ("h", "a2")])
        .graph(
            "T",
            &[("weak", "C"), ("strong", "C"), ("x", "A"), ("y", "A"), ("z", "A")],
            &[("weak", "x"), ("strong", "y"), ("strong", "z")],
        );
    let (q, t) = (f.index("Q"), f.index("T"));
    let h = q.resolve(f.id("Q", "h")).unwrap();
    let weak = t.resolve(f.id("T", "weak")).unwrap();
    let strong = t.resolve(f.id("T", "strong")).unwrap();

    let union = CandidateDomains::build(&q, &t, DomainPolicy::LabelUnion, None).unwrap();
    assert_eq!(union.get(h), &[weak, strong]);
    let profiled = CandidateDomains::build(&q, &t, DomainPolicy::ProfileDominance, None).unwrap();
    assert_eq!(profiled.get(h), &[strong]);

    // Both policies agree on the final embeddings.
    let naive = match_graphs(&f.store, &Label::new("Q"), &Label::new("T"), &Config::default(), None).unwrap();
    let graphql = match_graphs(
        &f.store,
        &Label::new("Q"),
        &Label::new("T"),
        &Config::builder().profile_dominance().build(),
        None,
    )
    .unwrap();
    let sorted = |o: &MatchOutcome| {
        let mut e = o.embeddings().to_vec();
        e.sort();
        e
    };
    assert_eq!(sorted(&naive), sorted(&graphql));
    assert_eq!(naive.len(), 2);
}

#[test]
fn domains_are_stable_across_builds() {
    let f = STAR.store();
    let (q, t) = (f.index("Q"), f.index("T"));
    for policy in [DomainPolicy::LabelUnion, DomainPolicy::ProfileDominance] {
        let first = CandidateDomains::build(&q, &t, policy, None).unwrap();
        let second = CandidateDomains::build(&q, &t, policy, None).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn restored_compression_gives_the_same_matches() {
    setup_test_logging();
    let mut f = STAR.store();
    let target = Label::new("T");
    let config = Config::builder().boost().build();

    let built = build_adapted_graph(&f.store, &target, &config).unwrap();
    let fresh = match_graphs(&f.store, &Label::new("Q"), &target, &config, Some(&built)).unwrap();

    built.persist(&f.index("T"), &mut f.store).unwrap();
    let restored = CompressedGraph::restore(&f.index("T"), &f.store).unwrap();
    assert_eq!(restored, built);

    let reused = match_graphs(&f.store, &Label::new("Q"), &target, &config, Some(&restored)).unwrap();
    assert_eq!(fresh.embeddings(), reused.embeddings());
    assert_eq!(reused.len(), 3);
}

#[test]
fn foreign_compression_is_rebuilt() {
    let f = STAR.store().graph("U", &[("u", "A")], &[]);
    let other = build_adapted_graph(&f.store, &Label::new("U"), &Config::default()).unwrap();
    let config = Config::builder().explode_equivalents().build();
    let outcome = match_graphs(&f.store, &Label::new("Q"), &Label::new("T"), &config, Some(&other)).unwrap();
    assert_eq!(outcome.len(), 3);
}
