use fastrand::Rng;

use workshop_finder::processing::{
    apply_categorical_filters, lookup_by_pincode, query, Criteria, ResultSet, Selector,
};
use workshop_finder::types::{DataSet, Value, Workshop};

fn example_dataset() -> DataSet {
    DataSet::from_records(vec![
        Workshop::new("110001").with_channel("A").with_body_shop("X").with_state("DL"),
        Workshop::new("110002").with_channel("B").with_body_shop("Y").with_state("DL"),
    ])
}

/// `None` or one of `options`, uniformly.
fn pick<'a>(rng: &mut Rng, options: &[&'a str]) -> Option<&'a str> {
    options.get(rng.usize(..=options.len())).copied()
}

const PINS: [&str; 4] = ["110001", "110002", "011001", "560001"];
const CHANNELS: [&str; 2] = ["A", "B"];
const BODY_SHOPS: [&str; 2] = ["X", "Y"];
const STATES: [&str; 3] = ["DL", "MH", "KA"];

fn random_dataset(rng: &mut Rng) -> DataSet {
    let n = rng.usize(..12);
    let records = (0..n)
        .map(|i| Workshop {
            pincode: pick(rng, &PINS).map(str::to_string),
            channel: pick(rng, &CHANNELS).map(str::to_string),
            body_shop: pick(rng, &BODY_SHOPS).map(str::to_string),
            state: pick(rng, &STATES).map(str::to_string),
            ..Default::default()
        }
        .with_extra("row", Value::Int64(i as i64)))
        .collect();
    DataSet::from_records(records)
}

fn random_selector(rng: &mut Rng, options: &[&str]) -> Selector {
    pick(rng, options).map(Selector::only).unwrap_or_default()
}

fn random_criteria(rng: &mut Rng) -> Criteria {
    let pincode = match rng.u8(..6) {
        0 => String::new(),
        1 => "999999".to_string(),
        _ => pick(rng, &PINS).unwrap_or("110001").to_string(),
    };
    Criteria::new()
        .pincode(pincode)
        .channel(random_selector(rng, &CHANNELS))
        .body_shop(random_selector(rng, &BODY_SHOPS))
        .state(random_selector(rng, &STATES))
        .limit(rng.usize(..7))
}

#[test]
fn worked_example() {
    let d = example_dataset();

    let hit = query(&d, &Criteria::new().pincode("110002"));
    assert_eq!(hit.iter().cloned().collect::<Vec<_>>(), vec![d.records()[1].clone()]);

    let miss = query(&d, &Criteria::new().pincode("999999").limit(1));
    assert_eq!(miss.iter().cloned().collect::<Vec<_>>(), vec![d.records()[0].clone()]);

    let by_channel = query(&d, &Criteria::new().pincode("").channel("B"));
    assert_eq!(by_channel.iter().cloned().collect::<Vec<_>>(), vec![d.records()[1].clone()]);
}

#[test]
fn query_is_idempotent() {
    let mut rng = Rng::with_seed(7);
    for _ in 0..200 {
        let d = random_dataset(&mut rng);
        let c = random_criteria(&mut rng);
        assert_eq!(query(&d, &c), query(&d, &c));
    }
}

#[test]
fn lookup_respects_limit_and_fallback() {
    let mut rng = Rng::with_seed(11);
    for _ in 0..200 {
        let d = random_dataset(&mut rng);
        let limit = rng.usize(..6);
        let pincode = pick(&mut rng, &PINS).unwrap_or("999999");
        let out = lookup_by_pincode(&d, pincode, limit);

        assert!(out.len() <= limit);

        let any_match = d.records().iter().any(|w| w.pincode.as_deref() == Some(pincode));
        if any_match {
            assert!(out.iter().all(|w| w.pincode.as_deref() == Some(pincode)));
            let expected: Vec<usize> = (0..d.row_count())
                .filter(|&i| d.records()[i].pincode.as_deref() == Some(pincode))
                .take(limit)
                .collect();
            assert_eq!(out.indices(), expected.as_slice());
        } else {
            let expected: Vec<usize> = (0..d.row_count().min(limit)).collect();
            assert_eq!(out.indices(), expected.as_slice());
        }
    }
}

#[test]
fn results_are_subsequences_of_the_dataset() {
    let mut rng = Rng::with_seed(23);
    for _ in 0..200 {
        let d = random_dataset(&mut rng);
        let c = random_criteria(&mut rng);
        let out = query(&d, &c);

        assert!(out.indices().windows(2).all(|w| w[0] < w[1]));
        for (idx, w) in out.indices().iter().zip(out.iter()) {
            assert!(std::ptr::eq(w, &d.records()[*idx]));
        }
    }
}

#[test]
fn all_selectors_leave_rows_untouched() {
    let mut rng = Rng::with_seed(31);
    for _ in 0..50 {
        let d = random_dataset(&mut rng);
        let rows = ResultSet::all(&d);
        let out = apply_categorical_filters(rows.clone(), &Selector::All, &Selector::All, &Selector::All);
        assert_eq!(out, rows);
    }
}

#[test]
fn fallback_is_never_empty_for_non_empty_dataset() {
    let mut rng = Rng::with_seed(43);
    for _ in 0..100 {
        let d = random_dataset(&mut rng);
        let out = query(&d, &Criteria::new().pincode("999999").limit(3));
        assert_eq!(out.is_empty(), d.is_empty());
    }
}
