use crate::utils::*;
use clap::Args;
use sapper_core as game;
use yew::prelude::*;

/// What a single cell looks like on screen.
#[derive(Copy, Clone, Debug, PartialEq)]
enum ViewCellState {
    Hidden,
    Revealed(u8),
    Flagged,
    TriggeredBomb,
    Bomb,
}

fn cell_state_at(game: &game::Game, coords: game::Coord2) -> ViewCellState {
    let cell = game.cell_at(coords);

    if game.is_lost() && cell.is_bomb {
        if game.triggered_bomb() == Some(coords) {
            ViewCellState::TriggeredBomb
        } else {
            ViewCellState::Bomb
        }
    } else if cell.is_flagged {
        ViewCellState::Flagged
    } else if cell.is_revealed {
        ViewCellState::Revealed(cell.value)
    } else {
        ViewCellState::Hidden
    }
}

/// Engine call a pointer event maps to.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Action {
    Reveal,
    Flag,
    Chord,
}

impl Action {
    /// Maps `MouseEvent.button` of a single click, primary reveals and secondary flags.
    pub(crate) const fn from_button(button: i16) -> Option<Self> {
        match button {
            0 => Some(Self::Reveal),
            2 => Some(Self::Flag),
            _ => None,
        }
    }
}

pub trait HasUpdate {
    fn has_update(self) -> bool;
}

impl HasUpdate for game::Result<game::MarkOutcome> {
    fn has_update(self) -> bool {
        self.inspect_err(|err| log::debug!("mark rejected: {}", err))
            .is_ok_and(|outcome| outcome.has_update())
    }
}

impl HasUpdate for game::Result<game::RevealOutcome> {
    fn has_update(self) -> bool {
        self.inspect_err(|err| log::debug!("reveal rejected: {}", err))
            .is_ok_and(|outcome| outcome.has_update())
    }
}

/// Runs one translated input against the engine, returning whether a re-render is needed.
fn apply_action(game: &mut game::Game, pos: game::Coord2, action: Action) -> bool {
    match action {
        Action::Reveal => game.reveal_cell(pos).has_update(),
        // flagging a revealed cell means nothing, don't bother the engine
        Action::Flag if game.cell_at(pos).is_revealed => false,
        Action::Flag => game.flag_cell(pos).has_update(),
        Action::Chord => game.chord(pos).has_update(),
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    CellAction(game::Coord2, Action),
    NewGame,
}

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    x: game::Coord,
    y: game::Coord,
    cell_state: ViewCellState,
    callback: Callback<Msg>,
}

#[function_component(CellView)]
fn cell_component(props: &CellProps) -> Html {
    use ViewCellState::*;

    let CellProps {
        x,
        y,
        cell_state,
        callback,
    } = props.clone();

    let class = classes!(
        "cell",
        match cell_state {
            Hidden => classes!(),
            Revealed(count) => classes!("open", format!("num-{}", count)),
            Flagged => classes!("flag"),
            TriggeredBomb => classes!("open", "mine", "oops"),
            Bomb => classes!("open", "mine"),
        }
    );
    let label = match cell_state {
        Revealed(count) if count > 0 => count.to_string(),
        _ => String::new(),
    };

    let onmouseup = {
        let callback = callback.clone();
        Callback::from(move |e: MouseEvent| {
            log::trace!("({}, {}) mouse up ({})", x, y, e.button());
            if let Some(action) = Action::from_button(e.button()) {
                callback.emit(Msg::CellAction((x, y), action));
            }
        })
    };

    let ondblclick = Callback::from(move |_: MouseEvent| {
        log::trace!("({}, {}) double click", x, y);
        callback.emit(Msg::CellAction((x, y), Action::Chord));
    });

    html! {
        <td>
            <button type="button" {class} {onmouseup} {ondblclick}>{label}</button>
        </td>
    }
}

#[derive(Args, Properties, Debug, Default, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    #[arg(short, long)]
    #[prop_or_default]
    pub seed: Option<u64>,
}

#[derive(Debug)]
pub(crate) struct GameView {
    game: game::Game,
    pinned_seed: Option<u64>,
}

impl GameView {
    fn next_seed(&self) -> u64 {
        self.pinned_seed.unwrap_or_else(js_random_seed)
    }

    fn get_game_state_class(&self) -> Classes {
        use game::GameState::*;
        classes!(match self.game.state() {
            NotStarted => "not-started",
            InProgress => "in-progress",
            Won => "win",
            Lost => "lose",
        })
    }

    fn view_result(&self, ctx: &Context<Self>) -> Html {
        let (title, class) = match self.game.state() {
            game::GameState::Won => ("YOU WON", "won"),
            game::GameState::Lost => ("YOU LOST", "lost"),
            _ => return html! {},
        };
        let cb_new_game = ctx.link().callback(|_: MouseEvent| Msg::NewGame);

        html! {
            <Modal>
                <div class="overlay">
                    <article class={class}>
                        <h2>{title}</h2>
                        <button type="button" onclick={cb_new_game}>{"Restart"}</button>
                    </article>
                </div>
            </Modal>
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let pinned_seed = ctx.props().seed;
        let seed = pinned_seed.unwrap_or_else(js_random_seed);
        Self {
            game: game::Game::new(game::GameConfig::classic(), seed),
            pinned_seed,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            CellAction(pos, action) => {
                log::debug!("{:?} cell: {:?}", action, pos);
                apply_action(&mut self.game, pos, action)
            }
            NewGame => {
                let seed = self.next_seed();
                self.game.restart(seed);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let (cols, rows) = self.game.size();
        let game_state_class = self.get_game_state_class();
        let bombs_left = format_for_counter(self.game.bombs_left() as i32);
        let root_class = classes!("sapper", self.game.is_lost().then_some("lost"));

        let cb_new_game = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            Msg::NewGame
        });
        let callback = ctx.link().callback(|msg: Msg| msg);

        html! {
            <div class={root_class} oncontextmenu={Callback::from(move |e: MouseEvent| e.prevent_default())}>
                <header>
                    <h1>{"MineSweeper"}</h1>
                </header>
                <nav>
                    <aside>{bombs_left}</aside>
                    <span><button type="button" class={game_state_class} onclick={cb_new_game}/></span>
                </nav>
                <table class="board">
                    {
                        for (0..rows).map(|y| html! {
                            <tr>
                                {
                                    for (0..cols).map(|x| {
                                        let cell_state = cell_state_at(&self.game, (x, y));
                                        let callback = callback.clone();
                                        html! {
                                            <CellView {x} {y} {cell_state} {callback}/>
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
                { self.view_result(ctx) }
            </div>
        }
    }
}
