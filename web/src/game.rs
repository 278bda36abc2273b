use chrono::prelude::*;
use cifrita_core as game;
use gloo::events::EventListener;
use gloo::timers::callback::Interval;
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsCast;
use yew::prelude::*;

use crate::settings::SettingsView;
use crate::stats::{self, StatsView};
use crate::theme::Theme;
use crate::utils::*;

fn utc_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(js_sys::Date::now() as i64).unwrap()
}

fn new_engine(seed: u64) -> game::PlayEngine {
    use game::EquationGenerator;
    let answer = game::RandomEquationGenerator::new(seed).generate();
    log::debug!("new round, target {}", answer.value());
    game::PlayEngine::new(answer)
}

/// One round as the player sees it: the scored board plus the row being
/// typed. The engine owns all scoring state; this wrapper adds the input
/// buffer, hint flag, and timing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct GameSession {
    pub engine: game::PlayEngine,
    pub current: game::GuessRow,
    pub hint_taken: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub move_count: u32,
}

impl GameSession {
    fn new(engine: game::PlayEngine) -> Self {
        Self {
            engine,
            current: [None; game::TILES_PER_GUESS],
            hint_taken: false,
            started_at: None,
            ended_at: None,
            move_count: 0,
        }
    }

    fn elapsed_secs(&self, now: DateTime<Utc>) -> u32 {
        if let Some(started_at) = self.started_at {
            (self.ended_at.unwrap_or(now) - started_at)
                .num_seconds()
                .max(0) as u32
        } else {
            0
        }
    }

    /// Leftmost empty tile of the input row, if any.
    fn cursor(&self) -> Option<usize> {
        self.current.iter().position(|cell| cell.is_none())
    }

    fn push_char(&mut self, c: char) -> bool {
        if self.engine.is_finished() || !game::is_expression_char(c) {
            return false;
        }
        match self.cursor() {
            Some(idx) => {
                self.current[idx] = Some(c);
                true
            }
            None => false,
        }
    }

    /// Clears the rightmost filled tile.
    fn pop_char(&mut self) -> bool {
        if self.engine.is_finished() {
            return false;
        }
        for cell in self.current.iter_mut().rev() {
            if cell.is_some() {
                *cell = None;
                return true;
            }
        }
        false
    }

    /// Character and color for one board tile: scored rows come from the
    /// engine, the row after them is the live input buffer.
    fn tile(&self, row: usize, col: usize) -> (Option<char>, game::TileColor) {
        let rows = self.engine.rows();
        if row < rows.len() {
            let scored = &rows[row];
            (Some(scored.expression.char_at(col)), scored.verdict[col])
        } else if row == rows.len() && !self.engine.is_finished() {
            (self.current[col], game::TileColor::Unset)
        } else {
            (None, game::TileColor::Unset)
        }
    }

    fn on_successful_move(&mut self, now: DateTime<Utc>) {
        self.move_count = self.move_count.saturating_add(1);

        if self.started_at.is_none() {
            self.started_at = Some(now);
        }

        if self.engine.is_finished() && self.ended_at.is_none() {
            self.ended_at = Some(now);
        }
    }
}

impl StorageKey for GameSession {
    const KEY: &'static str = "cifrita:game:v1";
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Key(char),
    Backspace,
    Submit,
    NewGame,
    UpdateTime,
    TakeHint,
    ToggleSettings,
    ApplyTheme(Theme),
}

const fn tile_class(color: game::TileColor) -> &'static str {
    use game::TileColor::*;
    match color {
        Unset => "unset",
        Absent => "absent",
        Present => "present",
        Match => "match",
    }
}

#[derive(Properties, Clone, PartialEq)]
struct KeyboardProps {
    playable: bool,
    callback: Callback<Msg>,
}

#[function_component(KeyboardView)]
fn keyboard_component(props: &KeyboardProps) -> Html {
    let key_row = |chars: &[char]| {
        html! {
            <div class="key-row">
                {
                    for chars.iter().map(|&c| {
                        let callback = props.callback.clone();
                        let onclick = Callback::from(move |_: MouseEvent| callback.emit(Msg::Key(c)));
                        html! {
                            <button {onclick} disabled={!props.playable}>{c.to_string()}</button>
                        }
                    })
                }
            </div>
        }
    };

    let on_backspace = {
        let callback = props.callback.clone();
        Callback::from(move |_: MouseEvent| callback.emit(Msg::Backspace))
    };
    let on_submit = {
        let callback = props.callback.clone();
        Callback::from(move |_: MouseEvent| callback.emit(Msg::Submit))
    };

    html! {
        <div class="keyboard">
            { key_row(&['0', '1', '2', '3', '4']) }
            { key_row(&['5', '6', '7', '8', '9']) }
            { key_row(&game::OPERATORS) }
            <div class="key-row">
                <button onclick={on_backspace} disabled={!props.playable}>{"←"}</button>
                <button class="enter" onclick={on_submit} disabled={!props.playable}>{"Enter"}</button>
            </div>
        </div>
    }
}

#[derive(Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    #[prop_or_default]
    pub seed: Option<u64>,
}

#[derive(Debug)]
pub(crate) struct GameView {
    session: GameSession,
    notice: Option<String>,
    prev_time: u32,
    settings_open: bool,
    _timer_interval: Interval,
    _keydown_listener: EventListener,
}

impl GameView {
    fn create_timer(ctx: &Context<Self>) -> Interval {
        let link = ctx.link().clone();
        Interval::new(500, move || link.send_message(Msg::UpdateTime))
    }

    fn create_keydown_listener(ctx: &Context<Self>) -> EventListener {
        let link = ctx.link().clone();
        EventListener::new(&gloo::utils::document(), "keydown", move |event| {
            let Some(event) = event.dyn_ref::<web_sys::KeyboardEvent>() else {
                return;
            };
            let key = event.key();
            let msg = match key.as_str() {
                "Enter" | "=" => Some(Msg::Submit),
                "Backspace" | "Delete" => Some(Msg::Backspace),
                k if k.chars().count() == 1 => {
                    k.chars().next().filter(|&c| game::is_expression_char(c)).map(Msg::Key)
                }
                _ => None,
            };
            if let Some(msg) = msg {
                link.send_message(msg);
            }
        })
    }

    fn is_playable(&self) -> bool {
        !self.session.engine.is_finished()
    }

    fn game_state_class(&self) -> &'static str {
        match self.session.engine.state() {
            game::EngineState::Playing if self.session.move_count == 0 => "not-started",
            game::EngineState::Playing => "in-progress",
            game::EngineState::Won => "win",
            game::EngineState::Lost => "lose",
        }
    }

    fn get_time(&self) -> u32 {
        self.session.elapsed_secs(utc_now())
    }

    fn submit_guess(&mut self) -> bool {
        let now = utc_now();
        let current = self.session.current;

        match self.session.engine.submit(&current) {
            Ok(outcome) => {
                self.session.current = [None; game::TILES_PER_GUESS];
                self.session.on_successful_move(now);
                self.notice = match outcome {
                    game::SubmitOutcome::Won => {
                        self.record_result(game::RoundResult::Win, now);
                        Some("Congratulations! You won!".to_string())
                    }
                    game::SubmitOutcome::Lost => {
                        self.record_result(game::RoundResult::Loss, now);
                        Some(format!(
                            "Game over. The correct answer was {}",
                            self.session.engine.answer().expression()
                        ))
                    }
                    game::SubmitOutcome::Ongoing => None,
                };
                true
            }
            Err(err) => {
                // recoverable: the attempt is not consumed
                log::debug!("rejected submission: {}", err);
                self.notice = Some(err.to_string());
                true
            }
        }
    }

    fn record_result(&self, result: game::RoundResult, now: DateTime<Utc>) {
        stats::append_result(game::GameRecord {
            date: now.format("%Y-%m-%d").to_string(),
            result,
            solution: self.session.engine.answer().expression().as_str().to_string(),
        });
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let seed = ctx.props().seed.unwrap_or_else(js_random_seed);
        let session = GameSession::local_load().unwrap_or_else(|| {
            log::debug!("seed: {}", seed);
            GameSession::new(new_engine(seed))
        });

        Self {
            session,
            notice: None,
            prev_time: 0,
            settings_open: false,
            _timer_interval: GameView::create_timer(ctx),
            _keydown_listener: GameView::create_keydown_listener(ctx),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        let updated = match msg {
            Key(c) => {
                let had_notice = self.notice.take().is_some();
                self.session.push_char(c) || had_notice
            }
            Backspace => {
                let had_notice = self.notice.take().is_some();
                self.session.pop_char() || had_notice
            }
            Submit => self.submit_guess(),
            NewGame => {
                let seed = js_random_seed();
                log::debug!("seed: {}", seed);
                self.session = GameSession::new(new_engine(seed));
                self.notice = None;
                true
            }
            UpdateTime => {
                let time = self.get_time();
                if self.prev_time != time {
                    self.prev_time = time;
                    true
                } else {
                    false
                }
            }
            TakeHint => {
                if self.session.hint_taken {
                    false
                } else {
                    self.session.hint_taken = true;
                    true
                }
            }
            ToggleSettings => {
                self.settings_open = !self.settings_open;
                true
            }
            ApplyTheme(theme) => {
                theme.apply();
                self.settings_open = false;
                true
            }
        };

        self.session.local_save();
        updated
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let playable = self.is_playable();
        let target = self.session.engine.target_value();
        let elapsed = self.get_time();

        let cb_new_game = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            NewGame
        });
        let cb_show_settings = ctx.link().callback(|_: MouseEvent| ToggleSettings);
        let cb_take_hint = ctx.link().callback(|_: MouseEvent| TakeHint);
        let cb_theme = ctx.link().callback(ApplyTheme);
        let keyboard_callback = ctx.link().callback(|msg: Msg| msg);

        html! {
            <div class="cifrita">
                <small onclick={cb_show_settings}>{"···"}</small>
                <nav>
                    <aside class="target">{format!("= {}", target)}</aside>
                    <span><button class={self.game_state_class()} onclick={cb_new_game}/></span>
                    <aside class="time">{format!("{}s", elapsed)}</aside>
                </nav>
                <table class={playable.then_some("playable")}>
                    {
                        for (0..game::TOTAL_GUESSES).map(|row| html! {
                            <tr>
                                {
                                    for (0..game::TILES_PER_GUESS).map(|col| {
                                        let (ch, color) = self.session.tile(row, col);
                                        html! {
                                            <td class={classes!("tile", tile_class(color))}>
                                                {ch.map(String::from).unwrap_or_default()}
                                            </td>
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
                if let Some(notice) = &self.notice {
                    <p class="notice">{notice.clone()}</p>
                }
                if self.session.hint_taken {
                    <p class="hint">
                        <b>{"Hint: "}</b>
                        {format!("the first three characters are {}", self.session.engine.answer().hint_prefix())}
                    </p>
                } else if playable {
                    <button class="hint" onclick={cb_take_hint}>{"Show hint"}</button>
                }
                <KeyboardView {playable} callback={keyboard_callback}/>
                if self.session.engine.is_finished() {
                    <StatsView/>
                }
                <SettingsView open={self.settings_open} on_theme={cb_theme}/>
            </div>
        }
    }
}
