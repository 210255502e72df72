use super::*;

fn opts(entries: &[&str]) -> Vec<String> {
    entries.iter().map(|s| s.to_string()).collect()
}

// --- add ---

#[test]
fn add_short_answer_assigns_monotonic_ids() {
    let mut deck = Deck::new();

    let first = deck.add_short_answer("Capital of France?", "Paris").unwrap();
    let second = deck.add_short_answer("Capital of Spain?", "Madrid").unwrap();

    assert_eq!(first.get(), 1);
    assert_eq!(second.get(), 2);
    assert_eq!(deck.len(), 2);
}

#[test]
fn add_rejects_blank_question_and_answer() {
    let mut deck = Deck::new();

    assert_eq!(
        deck.add_short_answer("   ", "Paris").unwrap_err(),
        DeckError::EmptyField { field: "question" }
    );
    assert_eq!(
        deck.add_short_answer("Capital of France?", "\t\n").unwrap_err(),
        DeckError::EmptyField { field: "answer" }
    );
    assert!(deck.is_empty(), "no card should be inserted on failure");
}

#[test]
fn add_rejects_duplicate_normalized_question() {
    let mut deck = Deck::new();
    deck.add_short_answer("Capital of France?", "Paris").unwrap();

    let result = deck.add_short_answer("  capital OF france? ", "Lyon");
    assert_eq!(
        result.unwrap_err(),
        DeckError::DuplicateQuestion {
            question: "capital of france?".to_string()
        }
    );
    assert_eq!(deck.len(), 1);
}

#[test]
fn add_multiple_choice_accepts_option_text_or_letter_answer() {
    let mut deck = Deck::new();

    let by_text = deck
        .add_multiple_choice("2+2?", opts(&["3", "4", "5"]), "4")
        .unwrap();
    assert_eq!(deck.get(by_text).unwrap().answer_option_index(), Some(1));

    let by_letter = deck
        .add_multiple_choice("3+3?", opts(&["5", "6"]), "B")
        .unwrap();
    assert_eq!(deck.get(by_letter).unwrap().answer_option_index(), Some(1));
}

#[test]
fn add_multiple_choice_rejects_answer_outside_options_without_mutating() {
    let mut deck = Deck::new();

    let result = deck.add_multiple_choice("2+2?", opts(&["3", "4"]), "9");
    assert!(matches!(
        result.unwrap_err(),
        DeckError::InvalidOptions { .. }
    ));
    assert!(deck.is_empty());

    // A later valid add still gets id 1: the failed attempt consumed nothing.
    let id = deck
        .add_multiple_choice("2+2?", opts(&["3", "4"]), "4")
        .unwrap();
    assert_eq!(id.get(), 1);
}

#[test]
fn add_multiple_choice_rejects_too_few_or_duplicate_options() {
    let mut deck = Deck::new();

    let result = deck.add_multiple_choice("2+2?", opts(&["4"]), "4");
    assert!(matches!(
        result.unwrap_err(),
        DeckError::InvalidOptions { .. }
    ));

    let result = deck.add_multiple_choice("2+2?", opts(&["4", "4"]), "4");
    assert!(matches!(
        result.unwrap_err(),
        DeckError::InvalidOptions { .. }
    ));

    // Options are distinct case-sensitively, so "four"/"Four" is fine.
    let result = deck.add_multiple_choice("2+2?", opts(&["four", "Four"]), "four");
    assert!(result.is_ok());
}

// --- get / edit ---

#[test]
fn get_unknown_id_is_card_not_found() {
    let deck = Deck::new();
    assert_eq!(
        deck.get(CardId::new(999)).unwrap_err(),
        DeckError::CardNotFound {
            id: CardId::new(999)
        }
    );
}

#[test]
fn edit_question_checks_duplicates_against_other_cards_only() {
    let mut deck = Deck::new();
    let first = deck.add_short_answer("Capital of France?", "Paris").unwrap();
    deck.add_short_answer("Capital of Spain?", "Madrid").unwrap();

    // Re-stating a card's own question (any casing) is allowed.
    deck.edit_question(first, "CAPITAL of France?").unwrap();
    assert_eq!(deck.get(first).unwrap().question(), "CAPITAL of France?");

    // Colliding with another card is not.
    let result = deck.edit_question(first, "capital of spain?");
    assert!(matches!(
        result.unwrap_err(),
        DeckError::DuplicateQuestion { .. }
    ));
    assert_eq!(deck.get(first).unwrap().question(), "CAPITAL of France?");
}

#[test]
fn edit_answer_on_mcq_must_resolve_to_an_option() {
    let mut deck = Deck::new();
    let id = deck
        .add_multiple_choice("2+2?", opts(&["3", "4", "5"]), "4")
        .unwrap();

    deck.edit_answer(id, "C").unwrap();
    assert_eq!(deck.get(id).unwrap().answer_option_index(), Some(2));

    let result = deck.edit_answer(id, "7");
    assert!(matches!(
        result.unwrap_err(),
        DeckError::InvalidOptions { .. }
    ));
    assert_eq!(deck.get(id).unwrap().answer(), "C");
}

#[test]
fn edit_options_rejects_short_answer_cards() {
    let mut deck = Deck::new();
    let id = deck.add_short_answer("Capital of France?", "Paris").unwrap();

    let result = deck.edit_options(id, opts(&["Paris", "Lyon"]));
    assert_eq!(result.unwrap_err(), DeckError::WrongVariant { id });
}

#[test]
fn edit_options_rejects_new_options_that_orphan_the_answer() {
    let mut deck = Deck::new();
    let id = deck
        .add_multiple_choice("2+2?", opts(&["3", "4"]), "4")
        .unwrap();

    // The stored answer "4" no longer resolves: caught now, not lazily.
    let result = deck.edit_options(id, opts(&["5", "6"]));
    assert!(matches!(
        result.unwrap_err(),
        DeckError::InvalidOptions { .. }
    ));
    assert_eq!(deck.get(id).unwrap().kind().options().unwrap(), &["3", "4"]);

    deck.edit_options(id, opts(&["4", "5", "6"])).unwrap();
    assert_eq!(deck.get(id).unwrap().answer_option_index(), Some(0));
}

// --- delete ---

#[test]
fn delete_removes_card_and_never_reuses_its_id() {
    let mut deck = Deck::new();
    let first = deck.add_short_answer("Capital of France?", "Paris").unwrap();

    deck.delete(first).unwrap();
    assert_eq!(
        deck.get(first).unwrap_err(),
        DeckError::CardNotFound { id: first }
    );

    let second = deck.add_short_answer("Capital of Spain?", "Madrid").unwrap();
    assert_eq!(second.get(), 2, "deleted id must not be reassigned");
}

#[test]
fn delete_cascades_out_of_every_tag_membership() {
    let mut deck = Deck::new();
    let id = deck.add_short_answer("Capital of France?", "Paris").unwrap();
    deck.tag(id, "geo").unwrap();
    deck.tag(id, "capitals").unwrap();

    deck.delete(id).unwrap();

    assert!(deck.tag_index().members_of("geo").unwrap().is_empty());
    assert!(deck.tag_index().members_of("capitals").unwrap().is_empty());
}

#[test]
fn delete_unknown_id_is_card_not_found() {
    let mut deck = Deck::new();
    let result = deck.delete(CardId::new(5));
    assert_eq!(
        result.unwrap_err(),
        DeckError::CardNotFound { id: CardId::new(5) }
    );
}

// --- find ---

#[test]
fn find_matches_id_question_and_answer_case_insensitively() {
    let mut deck = Deck::new();
    let first = deck.add_short_answer("Capital of France?", "Paris").unwrap();
    deck.add_short_answer("Largest planet?", "Jupiter").unwrap();

    let matches = deck.find("FRANCE").unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].id(), first);

    let matches = deck.find("paris").unwrap();
    assert_eq!(matches.len(), 1);

    let matches = deck.find("1").unwrap();
    assert_eq!(matches[0].id(), first);
}

#[test]
fn find_returns_matches_in_insertion_order() {
    let mut deck = Deck::new();
    deck.add_short_answer("Planet A?", "Mars").unwrap();
    deck.add_short_answer("Planet B?", "Venus").unwrap();
    deck.add_short_answer("Planet C?", "Pluto").unwrap();

    let matches = deck.find("planet").unwrap();
    let ids: Vec<i64> = matches.iter().map(|card| card.id().get()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn find_with_no_matches_is_an_error() {
    let mut deck = Deck::new();
    deck.add_short_answer("Capital of France?", "Paris").unwrap();

    let result = deck.find("germany");
    assert_eq!(
        result.unwrap_err(),
        DeckError::NoMatches {
            keyword: "germany".to_string()
        }
    );
}

// --- tag / untag ---

#[test]
fn tag_creates_the_tag_on_demand_and_updates_both_sides() {
    let mut deck = Deck::new();
    let id = deck.add_short_answer("Capital of France?", "Paris").unwrap();

    assert!(!deck.tag_index().has_tag("geo"));
    deck.tag(id, "geo").unwrap();

    assert!(deck.get(id).unwrap().tags().contains("geo"));
    assert!(deck.tag_index().members_of("geo").unwrap().contains(&id));
}

#[test]
fn tag_normalizes_names_before_matching() {
    let mut deck = Deck::new();
    let id = deck.add_short_answer("Capital of France?", "Paris").unwrap();

    deck.tag(id, "  Geo ").unwrap();
    let result = deck.tag(id, "GEO");
    assert_eq!(
        result.unwrap_err(),
        DeckError::DuplicateTag {
            id,
            name: "geo".to_string()
        }
    );
}

#[test]
fn retagging_fails_without_creating_anything() {
    let mut deck = Deck::new();
    let id = deck.add_short_answer("Capital of France?", "Paris").unwrap();
    deck.tag(id, "geo").unwrap();

    let result = deck.tag(id, "geo");
    assert!(matches!(result.unwrap_err(), DeckError::DuplicateTag { .. }));

    // Exactly one membership and one cached entry remain.
    assert_eq!(deck.tag_index().members_of("geo").unwrap().len(), 1);
    assert_eq!(deck.get(id).unwrap().tags().len(), 1);
}

#[test]
fn untag_round_trips_to_pre_tag_state() {
    let mut deck = Deck::new();
    let id = deck.add_short_answer("Capital of France?", "Paris").unwrap();

    deck.tag(id, "geo").unwrap();
    deck.untag(id, "geo").unwrap();

    assert!(deck.get(id).unwrap().tags().is_empty());
    assert!(deck.tag_index().members_of("geo").unwrap().is_empty());
    // The empty tag persists in the index.
    assert!(deck.tag_index().has_tag("geo"));
}

#[test]
fn untag_of_an_absent_tag_is_unknown_tag() {
    let mut deck = Deck::new();
    let id = deck.add_short_answer("Capital of France?", "Paris").unwrap();

    let result = deck.untag(id, "geo");
    assert_eq!(
        result.unwrap_err(),
        DeckError::UnknownTag {
            name: "geo".to_string()
        }
    );
}

#[test]
fn tagging_a_deleted_card_is_card_not_found() {
    let mut deck = Deck::new();
    let id = deck.add_short_answer("Capital of France?", "Paris").unwrap();
    deck.delete(id).unwrap();

    let result = deck.tag(id, "geo");
    assert_eq!(result.unwrap_err(), DeckError::CardNotFound { id });
    assert!(!deck.tag_index().has_tag("geo"), "failed tag must not create the tag");
}

// --- listing / reconstruction ---

#[test]
fn cards_iterates_in_insertion_order() {
    let mut deck = Deck::new();
    deck.add_short_answer("Q1?", "A1").unwrap();
    deck.add_short_answer("Q2?", "A2").unwrap();
    deck.add_short_answer("Q3?", "A3").unwrap();

    let questions: Vec<&str> = deck.cards().map(|card| card.question()).collect();
    assert_eq!(questions, vec!["Q1?", "Q2?", "Q3?"]);
}

#[test]
fn from_cards_rebuilds_memberships_and_id_counter() {
    let mut original = Deck::new();
    let first = original
        .add_short_answer("Capital of France?", "Paris")
        .unwrap();
    original.tag(first, "geo").unwrap();
    original
        .add_multiple_choice("2+2?", opts(&["3", "4"]), "4")
        .unwrap();

    let cards: Vec<Flashcard> = original.cards().cloned().collect();
    let restored = Deck::from_cards(cards).unwrap();

    assert_eq!(restored.len(), 2);
    assert!(restored.tag_index().members_of("geo").unwrap().contains(&first));
    assert_eq!(restored.next_id(), original.next_id());
}

#[test]
fn from_cards_rejects_duplicate_questions() {
    let a = CardBuilder::new()
        .id(CardId::new(1))
        .question("Capital of France?")
        .answer("Paris")
        .build();
    let b = CardBuilder::new()
        .id(CardId::new(2))
        .question("capital of france?")
        .answer("Lyon")
        .build();

    let result = Deck::from_cards(vec![a, b]);
    assert!(matches!(
        result.unwrap_err(),
        DeckError::DuplicateQuestion { .. }
    ));
}

#[test]
fn from_cards_rejects_unresolvable_mcq_answer() {
    let card = CardBuilder::new()
        .id(CardId::new(1))
        .question("What is 2 + 2?")
        .answer("9")
        .options(opts(&["3", "4"]))
        .build();

    let result = Deck::from_cards(vec![card]);
    assert!(
        matches!(result.unwrap_err(), DeckError::InvalidOptions { .. }),
        "an answer that resolves to no option must not survive restoration"
    );
}

#[test]
fn from_cards_rejects_blank_question() {
    let card = CardBuilder::new()
        .id(CardId::new(1))
        .question("   ")
        .answer("Paris")
        .build();

    let result = Deck::from_cards(vec![card]);
    assert_eq!(result.unwrap_err(), DeckError::EmptyField { field: "question" });
}

#[test]
fn add_multiple_choice_caps_option_count() {
    let mut deck = Deck::new();

    let too_many: Vec<String> = (0..27).map(|n| format!("option {n}")).collect();
    let result = deck.add_multiple_choice("Pick one?", too_many, "option 0");
    assert!(matches!(result.unwrap_err(), DeckError::InvalidOptions { .. }));

    let at_cap: Vec<String> = (0..26).map(|n| format!("option {n}")).collect();
    let id = deck
        .add_multiple_choice("Pick one?", at_cap, "Z")
        .expect("26 options is the last letter-addressable size");
    assert_eq!(deck.get(id).unwrap().answer_option_index(), Some(25));
}
