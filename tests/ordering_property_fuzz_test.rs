use frais::views::bills::{BillsViewState, bills_ui};
use frais::{Bill, BillStatus, MockStore, RoutePath, User, Window};
use proptest::collection::vec;
use proptest::prelude::*;
use proptest::test_runner::{FileFailurePersistence, TestCaseResult};

const ORDERING_PROPTEST_REGRESSION_FILE: &str =
    "tests/proptest-regressions/ordering_property_fuzz_test.txt";
const DEFAULT_ORDERING_PROPTEST_CASES: u32 = 128;

const DATE_PATTERN: &str = r"^(19|20)\d\d-(0[1-9]|1[012])-(0[1-9]|[12][0-9]|3[01])$";

fn ordering_proptest_cases() -> u32 {
    std::env::var("FRAIS_PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_ORDERING_PROPTEST_CASES)
}

fn date_strategy() -> BoxedStrategy<String> {
    (1990u32..=2029, 1u32..=12, 1u32..=28)
        .prop_map(|(year, month, day)| format!("{year:04}-{month:02}-{day:02}"))
        .boxed()
}

fn bill_with_date(index: usize, date: String) -> Bill {
    Bill {
        id: format!("bill-{index}"),
        bill_type: "Transports".into(),
        name: format!("note {index}"),
        email: "a@a".into(),
        amount: 10 + index as i64,
        date,
        vat: "20".into(),
        pct: 20,
        status: BillStatus::Pending,
        commentary: String::new(),
        file_url: format!("https://localhost:3456/images/{index}.jpg"),
        file_name: format!("{index}.jpg"),
    }
}

fn assert_rows_render_in_descending_date_order(dates: &[String]) -> TestCaseResult {
    let bills = dates
        .iter()
        .enumerate()
        .map(|(index, date)| bill_with_date(index, date.clone()))
        .collect::<Vec<_>>();

    let mut win = Window::new(MockStore::empty())
        .map_err(|err| proptest::test_runner::TestCaseError::fail(format!("{err:?}")))?;
    let markup = bills_ui(&BillsViewState {
        data: &bills,
        ..Default::default()
    });
    win.set_body_html(&markup)
        .map_err(|err| proptest::test_runner::TestCaseError::fail(format!("{err:?}")))?;

    let rendered = win
        .find_text_matching(DATE_PATTERN)
        .map_err(|err| proptest::test_runner::TestCaseError::fail(format!("{err:?}")))?;
    prop_assert_eq!(rendered.len(), dates.len());

    let mut expected = dates.to_vec();
    expected.sort_by(|a, b| b.cmp(a));
    prop_assert_eq!(&rendered, &expected, "input dates: {:?}", dates);
    Ok(())
}

fn assert_extension_gate(file_name: &str, should_accept: bool) -> TestCaseResult {
    let outcome = (|| -> frais::Result<bool> {
        let mut win = Window::new(MockStore::new())?;
        win.storage_mut().set_user(&User::employee("a@a"))?;
        win.navigate(RoutePath::NewBill)?;
        win.attach_file("[data-testid='file']", file_name, "application/octet-stream")?;
        let error_text = win.text("[data-testid='errorMsg']")?;
        Ok(error_text.trim().is_empty())
    })();
    match outcome {
        Ok(accepted) => {
            prop_assert_eq!(accepted, should_accept, "file name: {:?}", file_name);
            Ok(())
        }
        Err(error) => {
            prop_assert!(false, "journey failed for {file_name:?}: {error:?}");
            Ok(())
        }
    }
}

fn extension_strategy() -> BoxedStrategy<String> {
    prop_oneof![
        3 => prop_oneof![
            Just("jpg".to_string()),
            Just("jpeg".to_string()),
            Just("png".to_string()),
            Just("JPG".to_string()),
            Just("Png".to_string()),
            Just("JPEG".to_string()),
        ],
        2 => "[a-z0-9]{1,5}",
    ]
    .boxed()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: ordering_proptest_cases(),
        failure_persistence: Some(Box::new(
            FileFailurePersistence::Direct(ORDERING_PROPTEST_REGRESSION_FILE),
        )),
        .. ProptestConfig::default()
    })]

    #[test]
    fn rendered_rows_keep_descending_lexicographic_date_order(
        dates in vec(date_strategy(), 1..=12),
    ) {
        assert_rows_render_in_descending_date_order(&dates)?;
    }

    #[test]
    fn file_extension_gate_accepts_exactly_the_allow_list(
        stem in "[a-z]{1,8}",
        extension in extension_strategy(),
    ) {
        let file_name = format!("{stem}.{extension}");
        let should_accept = matches!(
            extension.to_ascii_lowercase().as_str(),
            "jpg" | "jpeg" | "png"
        );
        assert_extension_gate(&file_name, should_accept)?;
    }
}
