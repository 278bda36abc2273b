use cifrita_core as game;
use gloo::storage::{LocalStorage, Storage};
use yew::prelude::*;

/// The results list is stored as a raw JSON string, the same shape the
/// profile-metadata field uses, so it is read and written through the
/// core codec instead of a serde round-trip.
const RESULTS_KEY: &str = "cifrita:results";

fn load_raw_results() -> Option<String> {
    LocalStorage::raw().get_item(RESULTS_KEY).ok().flatten()
}

/// Appends one finished round to the persisted results list.
pub(crate) fn append_result(record: game::GameRecord) {
    let existing = load_raw_results();
    match game::append_record(existing.as_deref(), record) {
        Ok(encoded) => {
            if let Err(err) = LocalStorage::raw().set_item(RESULTS_KEY, &encoded) {
                log::error!("failed to persist results: {:?}", err);
            }
        }
        Err(err) => log::error!("past results list is corrupted: {}", err),
    }
}

pub(crate) fn load_results() -> Vec<game::GameRecord> {
    let Some(raw) = load_raw_results() else {
        return Vec::new();
    };
    match game::decode_records(&raw) {
        Ok(records) => records,
        Err(err) => {
            log::error!("past results list is corrupted: {}", err);
            Vec::new()
        }
    }
}

#[function_component(StatsView)]
pub(crate) fn stats_view() -> Html {
    let records = load_results();
    if records.is_empty() {
        return html! {
            <section class="stats">
                <h2>{"Past results"}</h2>
                <p>{"No finished rounds yet."}</p>
            </section>
        };
    }

    let wins = records
        .iter()
        .filter(|r| r.result == game::RoundResult::Win)
        .count();
    let win_rate = 100 * wins / records.len();

    html! {
        <section class="stats">
            <h2>{"Past results"}</h2>
            <p>{format!("{} played, {} won ({}%)", records.len(), wins, win_rate)}</p>
            <table>
                <thead>
                    <tr><th>{"Date"}</th><th>{"Result"}</th><th>{"Solution"}</th></tr>
                </thead>
                <tbody>
                    {
                        for records.iter().rev().map(|record| {
                            let result = match record.result {
                                game::RoundResult::Win => "win",
                                game::RoundResult::Loss => "loss",
                            };
                            html! {
                                <tr class={result}>
                                    <td>{record.date.clone()}</td>
                                    <td>{result}</td>
                                    <td><code>{record.solution.clone()}</code></td>
                                </tr>
                            }
                        })
                    }
                </tbody>
            </table>
        </section>
    }
}
