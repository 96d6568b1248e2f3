use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{prelude::*, widgets::*, Frame};
use tokio::sync::mpsc::UnboundedSender;

use crate::state_store::{action::Action, Notice, NoticeKind, Route, State};

use self::{
    create_page::CreatePage, home_page::HomePage, info_page::InfoPage, join_page::JoinPage,
    room_page::RoomPage,
};

use super::components::{Component, ComponentRender};

mod create_page;
mod home_page;
mod info_page;
mod join_page;
mod room_page;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActivePage {
    Home,
    Join,
    Create,
    Info,
    Room,
}

struct Props {
    active_page: ActivePage,
    notice: Option<Notice>,
}

impl From<&State> for Props {
    fn from(state: &State) -> Self {
        Props {
            active_page: match state.route {
                Route::Home => ActivePage::Home,
                Route::Join => ActivePage::Join,
                Route::Create => ActivePage::Create,
                Route::Info => ActivePage::Info,
                Route::Room { .. } => ActivePage::Room,
            },
            notice: state.notice.clone(),
        }
    }
}

pub struct AppRouter {
    action_tx: UnboundedSender<Action>,
    props: Props,
    //
    home_page: HomePage,
    join_page: JoinPage,
    create_page: CreatePage,
    info_page: InfoPage,
    room_page: RoomPage,
}

impl AppRouter {
    fn get_active_page_component(&self) -> &dyn Component {
        match self.props.active_page {
            ActivePage::Home => &self.home_page,
            ActivePage::Join => &self.join_page,
            ActivePage::Create => &self.create_page,
            ActivePage::Info => &self.info_page,
            ActivePage::Room => &self.room_page,
        }
    }

    fn get_active_page_component_mut(&mut self) -> &mut dyn Component {
        match self.props.active_page {
            ActivePage::Home => &mut self.home_page,
            ActivePage::Join => &mut self.join_page,
            ActivePage::Create => &mut self.create_page,
            ActivePage::Info => &mut self.info_page,
            ActivePage::Room => &mut self.room_page,
        }
    }
}

impl Component for AppRouter {
    fn new(state: &State, action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
        AppRouter {
            action_tx: action_tx.clone(),
            props: Props::from(state),
            //
            home_page: HomePage::new(state, action_tx.clone()),
            join_page: JoinPage::new(state, action_tx.clone()),
            create_page: CreatePage::new(state, action_tx.clone()),
            info_page: InfoPage::new(state, action_tx.clone()),
            room_page: RoomPage::new(state, action_tx),
        }
        .move_with_state(state)
    }

    fn move_with_state(self, state: &State) -> Self
    where
        Self: Sized,
    {
        AppRouter {
            props: Props::from(state),
            //
            home_page: self.home_page.move_with_state(state),
            join_page: self.join_page.move_with_state(state),
            create_page: self.create_page.move_with_state(state),
            info_page: self.info_page.move_with_state(state),
            room_page: self.room_page.move_with_state(state),
            ..self
        }
    }

    // route all functions to the active page
    fn name(&self) -> &str {
        self.get_active_page_component().name()
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Press && key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => {
                    let _ = self.action_tx.send(Action::Exit);
                    return;
                }
                KeyCode::Char('x') => {
                    let _ = self.action_tx.send(Action::DismissNotice);
                    return;
                }
                _ => {}
            }
        }

        self.get_active_page_component_mut().handle_key_event(key)
    }
}

impl ComponentRender<()> for AppRouter {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, _props: ()) {
        let [container_page, container_notice] = *Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)].as_ref())
            .split(frame.size())
        else {
            panic!("The main layout should have 2 chunks")
        };

        match self.props.active_page {
            ActivePage::Home => self.home_page.render(frame, container_page),
            ActivePage::Join => self.join_page.render(frame, container_page),
            ActivePage::Create => self.create_page.render(frame, container_page),
            ActivePage::Info => self.info_page.render(frame, container_page),
            ActivePage::Room => self.room_page.render(frame, container_page),
        }

        let notice_line = match self.props.notice.as_ref() {
            Some(notice) => {
                let color = match notice.kind {
                    NoticeKind::Success => Color::Green,
                    NoticeKind::Error => Color::Red,
                };

                Line::from(vec![
                    Span::from(notice.text.as_str()).fg(color).bold(),
                    "  (Ctrl+x) to dismiss".dark_gray(),
                ])
            }
            None => Line::from(""),
        };
        frame.render_widget(Paragraph::new(notice_line), container_notice);
    }
}

/// Cuts a box of the given height out of the middle third of `area`
fn centered_rect(area: Rect, height: u16) -> Rect {
    let [_, vertical_centered, _] = *Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Min(0),
                Constraint::Length(height),
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(area)
    else {
        panic!("The vertical layout should have 3 chunks")
    };

    let [_, both_centered, _] = *Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Ratio(1, 4),
                Constraint::Min(1),
                Constraint::Ratio(1, 4),
            ]
            .as_ref(),
        )
        .split(vertical_centered)
    else {
        panic!("The horizontal layout should have 3 chunks")
    };

    both_centered
}
