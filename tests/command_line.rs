use std::sync::Arc;

use paramset::{
    Arity, At, LooseCollect, ParamSetError, ParameterSet, ParseOptions, PrioritySelector,
    WildcardExpander, PRIORITY_BASE,
};

fn values(set: &ParameterSet, name: &str) -> Vec<String> {
    let count = set.value_count(name, None, PrioritySelector::Any).unwrap();
    (0..count)
        .map(|i| {
            set.get_str(name, None, PrioritySelector::Any, At::Nth(i))
                .unwrap()
                .unwrap_or("<none>")
                .to_string()
        })
        .collect()
}

fn unknown_tokens(set: &ParameterSet) -> Vec<&str> {
    set.unknowns().iter().map(|u| u.offered.as_str()).collect()
}

// ============================================================================
// Default grammar
// ============================================================================

/// Without parse options every flag takes one following non-dash token.
#[test]
fn test_default_grammar() {
    let mut set = ParameterSet::new("{a}{b}{c}{d}{x}{e}").unwrap();
    set.parse_cmd(&["/bin/prog", "-abc", "-x", "-e", "e_value"], None, 0)
        .unwrap();

    assert_eq!(
        set.value_count("{a}{b}{c}{d}{x}{e}", None, PrioritySelector::Any)
            .unwrap(),
        5
    );
    assert_eq!(
        set.get_str("e", None, PrioritySelector::Any, At::First).unwrap(),
        Some("e_value")
    );
    assert_eq!(
        set.get_str("a", None, PrioritySelector::Any, At::First).unwrap(),
        None
    );
    assert_eq!(
        set.get_str("x", None, PrioritySelector::Any, At::First).unwrap(),
        None
    );

    match set.get_str("d", None, PrioritySelector::Any, At::First).unwrap_err() {
        ParamSetError::ParameterEmpty { name } => assert_eq!(name, "d"),
        other => panic!("Expected ParameterEmpty, got {:?}", other),
    }

    assert!(set.typos().is_empty());
    assert!(set.unknowns().is_empty());
}

#[test]
fn test_source_and_priority_are_recorded() {
    let mut set = ParameterSet::new("{v|verbose}{n}").unwrap();
    set.parse_cmd(&["prog", "--verbose", "-n", "3"], Some("cmd"), 4)
        .unwrap();

    let attrs = set
        .get_attributes("n", None, PrioritySelector::Any, At::First)
        .unwrap();
    assert_eq!(attrs.source.as_deref(), Some("cmd"));
    assert_eq!(attrs.priority, 4);
    assert!(set.is_set("v"));
    assert_eq!(
        set.value_count("verbose", Some("cmd"), PrioritySelector::Exactly(4))
            .unwrap(),
        1
    );
}

#[test]
fn test_parse_rejects_priority_above_roof() {
    let mut set = ParameterSet::new("{a}").unwrap();
    match set
        .parse_cmd(&["prog", "-a"], None, paramset::PRIORITY_ROOF + 1)
        .unwrap_err()
    {
        ParamSetError::PriorityTooLarge { .. } => {}
        other => panic!("Expected PriorityTooLarge, got {:?}", other),
    }
    assert!(!set.is_set("a"));
}

// ============================================================================
// Arity, bunches and unknown tokens
// ============================================================================

#[test]
fn test_arity_and_bunches() {
    let mut set = ParameterSet::new("{a}{b}{c}{d}{e}{x|xtra}{y}{w}{v}{f}{z}").unwrap();
    set.set_parse_options("{e}{x}{y}{w}{v}{z}", ParseOptions::new(Arity::Default))
        .unwrap();
    set.set_parse_options("{a}{b}{c}", ParseOptions::new(Arity::NoValue))
        .unwrap();
    set.set_parse_options("{d}", ParseOptions::new(Arity::Sequence).break_on_known())
        .unwrap();
    set.set_parse_options("{f}", ParseOptions::new(Arity::Value))
        .unwrap();

    let argv = [
        "/bin/prog", "-ywv", "unk_1", "unk_2", "-x", "x1", "--xtra", "x2", "-a", "unk_3", "-bc",
        "unk_4", "-d", "d1", "d2", "d3", "-d4", "-e", "e_value", "-f", "-f",
    ];
    set.parse_cmd(&argv, None, 0).unwrap();

    assert_eq!(
        set.value_count("{a}{b}{c}{d}{e}{f}{x}{y}{w}{v}", None, PrioritySelector::Any)
            .unwrap(),
        14
    );
    assert_eq!(values(&set, "d"), vec!["d1", "d2", "d3", "-d4"]);
    match set
        .get_str("d", None, PrioritySelector::Any, At::Nth(4))
        .unwrap_err()
    {
        ParamSetError::ValueNotFound { .. } => {}
        other => panic!("Expected ValueNotFound, got {:?}", other),
    }

    assert_eq!(values(&set, "x"), vec!["x1", "x2"]);
    assert_eq!(values(&set, "xtra"), vec!["x1", "x2"]);
    assert_eq!(values(&set, "f"), vec!["-f"]);
    assert_eq!(values(&set, "e"), vec!["e_value"]);
    assert_eq!(values(&set, "{y}{w}{v}"), vec!["<none>", "<none>", "<none>"]);
    assert!(!set.is_set("z"));

    assert!(set.typos().is_empty());
    assert_eq!(
        set.unknowns_to_string(""),
        "Unknown parameter 'unk_1'.\n\
         Unknown parameter 'unk_2'.\n\
         Unknown parameter 'unk_3'.\n\
         Unknown parameter 'unk_4'.\n"
    );
}

/// A bunch whose leading letters take values is not split.
#[test]
fn test_bunch_needs_valueless_leaders() {
    let mut set = ParameterSet::new("{a}{b}").unwrap();
    set.set_parse_options("a", ParseOptions::new(Arity::Value))
        .unwrap();
    set.parse_cmd(&["prog", "-ab", "-ba", "value"], None, 0)
        .unwrap();

    assert_eq!(values(&set, "b"), vec!["<none>"]);
    assert_eq!(values(&set, "a"), vec!["value"]);
    assert_eq!(unknown_tokens(&set), vec!["ab"]);
}

// ============================================================================
// Sequence break conditions
// ============================================================================

#[test]
fn test_sequence_breaks() {
    let mut set = ParameterSet::new("{mb}{db}{mdb}{all}{e}{f}").unwrap();
    set.set_parse_options("{e}{f}", ParseOptions::new(Arity::Default))
        .unwrap();
    set.set_parse_options("{mb}", ParseOptions::new(Arity::Sequence).break_on_known())
        .unwrap();
    set.set_parse_options("{db}", ParseOptions::new(Arity::Sequence).break_on_dash())
        .unwrap();
    set.set_parse_options(
        "{mdb}",
        ParseOptions::new(Arity::Sequence)
            .break_on_known()
            .break_on_dash(),
    )
    .unwrap();
    set.set_parse_options("{all}", ParseOptions::new(Arity::Sequence))
        .unwrap();

    let argv = [
        "/bin/prog", "--mb", "v0", "v1", "-x", "-e", "e_value_1", "notdef_1", "--db", "v-2",
        "v3-", "-notdef_2", "notdef_3", "-e", "e_value_2", "--mdb", "v4", "v5", "-e",
        "e_value_3", "--unknown", "--mdb", "v6", "v7", "-", "--dbm", "--all", "-e", "-x",
        "--mdb", "--", "-f", "-f",
    ];
    set.parse_cmd(&argv, None, 0).unwrap();

    assert_eq!(
        set.value_count("{mb}{db}{mdb}{all}{e}{f}", None, PrioritySelector::Any)
            .unwrap(),
        18
    );
    assert_eq!(values(&set, "mb"), vec!["v0", "v1", "-x"]);
    assert_eq!(values(&set, "db"), vec!["v-2", "v3-"]);
    assert_eq!(values(&set, "mdb"), vec!["v4", "v5", "v6", "v7"]);
    assert_eq!(values(&set, "e"), vec!["e_value_1", "e_value_2", "e_value_3"]);
    assert_eq!(
        values(&set, "all"),
        vec!["-e", "-x", "--mdb", "--", "-f", "-f"]
    );
    assert!(!set.is_set("f"));

    assert_eq!(set.typos_to_string(""), "Did You mean 'db' instead of 'dbm'.\n");
    assert_eq!(
        unknown_tokens(&set),
        vec!["notdef_1", "notdef_2", "notdef_3", "unknown", "-"]
    );
}

#[test]
fn test_dash_reopens_flags() {
    let mut set = ParameterSet::new("{mb}*{x}").unwrap();
    set.set_parse_options("mb", ParseOptions::new(Arity::Sequence).break_on_dash())
        .unwrap();
    set.parse_cmd(&["prog", "--mb", "v1", "v2", "-x"], None, 0)
        .unwrap();

    assert_eq!(values(&set, "mb"), vec!["v1", "v2"]);
    assert!(set.is_set("x"));
}

#[test]
fn test_bunch_leaves_trailing_token_loose() {
    let mut set = ParameterSet::new("{a}{b}").unwrap();
    set.set_parse_options("{a}{b}", ParseOptions::new(Arity::NoValue))
        .unwrap();
    set.parse_cmd(&["prog", "-ab", "extra"], None, 0).unwrap();

    assert_eq!(values(&set, "a,b"), vec!["<none>", "<none>"]);
    assert_eq!(unknown_tokens(&set), vec!["extra"]);
}

/// Known flags are matched without regard to case when breaking.
#[test]
fn test_break_on_known_ignores_case() {
    let mut set = ParameterSet::new("{list}{Verbose}").unwrap();
    set.set_parse_options("list", ParseOptions::new(Arity::Sequence).break_on_known())
        .unwrap();
    set.parse_cmd(&["prog", "--list", "a", "--VERBOSE", "b"], None, 0)
        .unwrap();

    assert_eq!(values(&set, "list"), vec!["a"]);
}

#[test]
fn test_stop_at_end_of_args() {
    let mut set = ParameterSet::new("{list}*{rest}*").unwrap();
    set.set_parse_options(
        "list",
        ParseOptions::new(Arity::Sequence).stop_at_end_of_args(),
    )
    .unwrap();
    set.set_parse_options(
        "rest",
        ParseOptions::new(Arity::Sequence).no_flag().collect(LooseCollect {
            after_end_of_args: true,
            ..LooseCollect::default()
        }),
    )
    .unwrap();
    set.parse_cmd(&["prog", "--list", "a", "-b", "--", "--list", "c"], None, 0)
        .unwrap();

    assert_eq!(values(&set, "list"), vec!["a", "-b"]);
    assert_eq!(values(&set, "rest"), vec!["--list", "c"]);
    assert!(set.unknowns().is_empty());
}

#[test]
fn test_break_conditions_need_value_arity() {
    let mut set = ParameterSet::new("{a}").unwrap();
    match set
        .set_parse_options("a", ParseOptions::new(Arity::Default).break_on_dash())
        .unwrap_err()
    {
        ParamSetError::InvalidCombination(_) => {}
        other => panic!("Expected InvalidCombination, got {:?}", other),
    }
}

// ============================================================================
// Loose values
// ============================================================================

fn collecting_set(collect: LooseCollect) -> ParameterSet {
    let mut set = ParameterSet::new("{file}*{v}").unwrap();
    set.set_parse_options(
        "file",
        ParseOptions::new(Arity::Default)
            .no_flag()
            .no_typos()
            .collect(collect),
    )
    .unwrap();
    set
}

#[test]
fn test_loose_values_are_collected() {
    let mut set = collecting_set(LooseCollect::default());
    set.parse_cmd(&["prog", "a.txt", "b.txt", "-v", "--file", "c.txt"], None, 3)
        .unwrap();

    assert_eq!(values(&set, "file"), vec!["a.txt", "b.txt", "c.txt"]);
    assert_eq!(values(&set, "v"), vec!["<none>"]);
    assert_eq!(unknown_tokens(&set), vec!["file"]);
}

#[test]
fn test_loose_limit_overflows_one_level_down() {
    let mut set = collecting_set(LooseCollect {
        limit: Some(2),
        ..LooseCollect::default()
    });
    set.parse_cmd(&["prog", "a", "b", "c", "-v"], Some("cmd"), PRIORITY_BASE + 2)
        .unwrap();

    assert_eq!(
        set.value_count("file", None, PrioritySelector::Exactly(PRIORITY_BASE + 2))
            .unwrap(),
        2
    );
    assert_eq!(
        set.get_str(
            "file",
            None,
            PrioritySelector::Exactly(PRIORITY_BASE + 1),
            At::First
        )
        .unwrap(),
        Some("c")
    );
    assert!(set.is_set("v"));
}

/// At the base level there is no lower level, so overflowing values are unknown.
#[test]
fn test_loose_limit_at_base_priority() {
    let mut set = collecting_set(LooseCollect {
        limit: Some(1),
        ..LooseCollect::default()
    });
    set.parse_cmd(&["prog", "a", "b"], None, PRIORITY_BASE)
        .unwrap();

    assert_eq!(values(&set, "file"), vec!["a"]);
    assert_eq!(unknown_tokens(&set), vec!["b"]);
}

#[test]
fn test_loose_lower_priority() {
    let mut set = collecting_set(LooseCollect {
        lower_priority: true,
        ..LooseCollect::default()
    });
    set.parse_cmd(&["prog", "a", "-v"], None, 5).unwrap();

    let attrs = set
        .get_attributes("file", None, PrioritySelector::Any, At::First)
        .unwrap();
    assert_eq!(attrs.priority, 4);
    let attrs = set
        .get_attributes("v", None, PrioritySelector::Any, At::First)
        .unwrap();
    assert_eq!(attrs.priority, 5);

    let mut set = collecting_set(LooseCollect {
        lower_priority: true,
        ..LooseCollect::default()
    });
    set.parse_cmd(&["prog", "a"], None, PRIORITY_BASE).unwrap();
    assert_eq!(
        set.get_attributes("file", None, PrioritySelector::Any, At::First)
            .unwrap()
            .priority,
        PRIORITY_BASE
    );
}

#[test]
fn test_loose_dashes() {
    let mut set = collecting_set(LooseCollect {
        dashes: true,
        ..LooseCollect::default()
    });
    set.parse_cmd(&["prog", "-zz", "--other", "plain"], None, 0)
        .unwrap();

    assert_eq!(values(&set, "file"), vec!["-zz", "--other", "plain"]);
    assert!(set.unknowns().is_empty());
    assert!(set.typos().is_empty());
}

#[test]
fn test_end_of_args_without_collector_is_unknown() {
    let mut set = collecting_set(LooseCollect::default());
    set.parse_cmd(&["prog", "--", "-v"], None, 0).unwrap();

    assert_eq!(unknown_tokens(&set), vec!["--"]);
    assert!(set.is_set("v"));
    assert!(!set.is_set("file"));
}

#[test]
fn test_only_one_collector() {
    let mut set = collecting_set(LooseCollect::default());
    match set
        .set_parse_options(
            "v",
            ParseOptions::new(Arity::Default).collect(LooseCollect::default()),
        )
        .unwrap_err()
    {
        ParamSetError::InvalidCombination(_) => {}
        other => panic!("Expected InvalidCombination, got {:?}", other),
    }

    // Re-configuring the collector itself is fine.
    set.set_parse_options(
        "file",
        ParseOptions::new(Arity::Default).no_flag().collect(LooseCollect {
            dashes: true,
            ..LooseCollect::default()
        }),
    )
    .unwrap();
}

// ============================================================================
// Typos, no-flag and no-typo parameters
// ============================================================================

#[test]
fn test_typo_suggestions() {
    let mut set = ParameterSet::new("{input}{output}{verbose}").unwrap();
    set.parse_cmd(&["prog", "--inptu", "x", "--verbos"], None, 0)
        .unwrap();

    assert_eq!(set.typos().len(), 2);
    assert_eq!(set.typos()[0].offered, "inptu");
    assert_eq!(set.typos()[0].suggestions, vec!["input"]);
    assert_eq!(set.typos()[1].suggestions, vec!["verbose"]);
    assert_eq!(unknown_tokens(&set), vec!["x"]);
    assert!(set.is_typo_failure());
}

#[test]
fn test_no_typos_hides_suggestion() {
    let mut set = ParameterSet::new("{input}{q}").unwrap();
    set.set_parse_options("input", ParseOptions::new(Arity::Default).no_typos())
        .unwrap();
    set.parse_cmd(&["prog", "--inptu"], None, 0).unwrap();

    assert!(set.typos().is_empty());
    assert_eq!(unknown_tokens(&set), vec!["inptu"]);
}

#[test]
fn test_no_flag_parameter_is_not_a_flag() {
    let mut set = collecting_set(LooseCollect::default());
    set.parse_cmd(&["prog", "--file", "a"], None, 0).unwrap();

    assert_eq!(values(&set, "file"), vec!["a"]);
    assert_eq!(unknown_tokens(&set), vec!["file"]);
}

// ============================================================================
// Wildcards
// ============================================================================

fn letter_expander() -> Arc<dyn WildcardExpander> {
    Arc::new(|pattern: &str| -> Result<Vec<String>, String> {
        let stem = pattern.trim_end_matches('*');
        Ok(vec![format!("{}1", stem), format!("{}2", stem)])
    })
}

#[test]
fn test_parsed_values_are_expanded() {
    let mut set = ParameterSet::new("{input}*").unwrap();
    set.set_parse_options(
        "input",
        ParseOptions::new(Arity::Sequence).expand_wildcard(),
    )
    .unwrap();
    set.set_wildcard_expander("input", None, letter_expander())
        .unwrap();
    set.add("input", Some("old*"), None, 0).unwrap();

    set.parse_cmd(&["prog", "--input", "a*", "plain"], None, 1)
        .unwrap();

    assert_eq!(values(&set, "input"), vec!["old*", "a1", "a2", "plain"]);
}

/// A value stored earlier at the same source and priority is not expanded
/// by a later parse.
#[test]
fn test_only_values_from_this_parse_are_expanded() {
    let mut set = ParameterSet::new("{input}*").unwrap();
    set.set_parse_options(
        "input",
        ParseOptions::new(Arity::Sequence).expand_wildcard(),
    )
    .unwrap();
    set.set_wildcard_expander("input", None, letter_expander())
        .unwrap();

    set.parse_cmd(&["prog", "--input", "x*"], Some("cmd"), 1)
        .unwrap();
    set.add("input", Some("lit*"), Some("cmd"), 1).unwrap();
    set.parse_cmd(&["prog", "--input", "y"], Some("cmd"), 1)
        .unwrap();

    assert_eq!(values(&set, "input"), vec!["x1", "x2", "lit*", "y"]);
}

fn expanding_collector(collect: LooseCollect) -> ParameterSet {
    let mut set = ParameterSet::new("{file}*{v}").unwrap();
    set.set_parse_options(
        "file",
        ParseOptions::new(Arity::Default)
            .no_flag()
            .no_typos()
            .collect(collect)
            .expand_wildcard(),
    )
    .unwrap();
    set.set_wildcard_expander("file", None, letter_expander())
        .unwrap();
    set
}

#[test]
fn test_lowered_loose_values_are_expanded() {
    let mut set = expanding_collector(LooseCollect {
        lower_priority: true,
        ..LooseCollect::default()
    });
    set.parse_cmd(&["prog", "a*", "-v"], None, 1).unwrap();

    assert_eq!(values(&set, "file"), vec!["a1", "a2"]);
    assert_eq!(
        set.value_count("file", None, PrioritySelector::Exactly(0))
            .unwrap(),
        2
    );
}

#[test]
fn test_overflowing_loose_values_are_expanded() {
    let mut set = expanding_collector(LooseCollect {
        limit: Some(1),
        ..LooseCollect::default()
    });
    set.parse_cmd(&["prog", "a*", "b*"], None, 1).unwrap();

    assert_eq!(values(&set, "file"), vec!["a1", "a2", "b1", "b2"]);
    assert_eq!(
        set.value_count("file", None, PrioritySelector::Exactly(0))
            .unwrap(),
        2
    );
}

#[test]
fn test_expansion_without_expander_fails() {
    let mut set = ParameterSet::new("{input}*").unwrap();
    set.set_parse_options("input", ParseOptions::new(Arity::Default).expand_wildcard())
        .unwrap();

    set.parse_cmd(&["prog", "--input", "plain"], None, 0)
        .unwrap();

    match set
        .parse_cmd(&["prog", "--input", "a?"], None, 1)
        .unwrap_err()
    {
        ParamSetError::UnimplementedWildcard { name } => assert_eq!(name, "input"),
        other => panic!("Expected UnimplementedWildcard, got {:?}", other),
    }
}
