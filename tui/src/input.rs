//! Key Handling
//!
//! Turns key presses into surface events. The only state kept here is what
//! the user is typing (chat line, signup fields, upload file name), the
//! cursor on the home grid and the chat scroll position; everything else is
//! decided by the controller.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use ecobin_core::{ScreenId, SurfaceEvent, WasteTypeId};

use crate::display::{DisplayState, ResultStage};
use crate::widgets::TextBlockState;

/// Longest mobile number accepted by the form
pub const MOBILE_DIGITS: usize = 10;

/// Lines moved by PageUp/PageDown in the chat transcript
pub const CHAT_PAGE: i32 = 5;

/// What the app should do with a key press
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// Nothing to send
    Nothing,
    /// Forward to the controller
    Send(SurfaceEvent),
    /// Leave the app
    Quit,
}

/// Focused signup field
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SignupField {
    #[default]
    Mobile,
    Password,
    Confirm,
}

impl SignupField {
    fn next(self) -> Self {
        match self {
            Self::Mobile => Self::Password,
            Self::Password => Self::Confirm,
            Self::Confirm => Self::Mobile,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Mobile => Self::Confirm,
            Self::Password => Self::Mobile,
            Self::Confirm => Self::Password,
        }
    }
}

/// Signup form contents
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignupInput {
    pub mobile: String,
    pub password: String,
    pub confirm: String,
    pub focus: SignupField,
}

impl SignupInput {
    fn field_mut(&mut self) -> &mut String {
        match self.focus {
            SignupField::Mobile => &mut self.mobile,
            SignupField::Password => &mut self.password,
            SignupField::Confirm => &mut self.confirm,
        }
    }

    fn submit(&self) -> SurfaceEvent {
        SurfaceEvent::Signup {
            mobile: self.mobile.clone(),
            password: self.password.clone(),
            confirm_password: self.confirm.clone(),
        }
    }
}

/// Local input state
#[derive(Clone, Debug, Default)]
pub struct InputState {
    /// Highlighted tile on the home grid
    pub home_cursor: usize,
    /// Signup form
    pub signup: SignupInput,
    /// File name being typed, while the upload prompt is open
    pub upload: Option<String>,
    /// Chat line being typed
    pub chat: String,
    /// Chat transcript scroll position
    pub chat_scroll: TextBlockState,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waste type under the home cursor
    pub fn highlighted(&self) -> WasteTypeId {
        WasteTypeId::ALL[self.home_cursor % WasteTypeId::ALL.len()]
    }

    /// Map a key press to an action
    pub fn handle_key(&mut self, key: KeyEvent, display: &DisplayState) -> KeyAction {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return KeyAction::Quit;
        }

        if self.upload.is_some() {
            return self.upload_key(key);
        }

        if key.code == KeyCode::F(2) {
            return KeyAction::Send(SurfaceEvent::ToggleChat);
        }

        if display.chat.open {
            return self.chat_key(key, display);
        }

        let screen_action = match display.active {
            Some(ScreenId::Landing) => Self::landing_key(key, display),
            Some(ScreenId::Signup) => self.signup_key(key),
            Some(ScreenId::Home) => self.home_key(key),
            Some(ScreenId::Map) => Self::map_key(key),
            Some(ScreenId::Scanning) => self.scanning_key(key),
            Some(ScreenId::Result) => Self::result_key(key, display),
            Some(ScreenId::History) => Self::history_key(key),
            None => None,
        };
        if let Some(action) = screen_action {
            return action;
        }

        match key.code {
            KeyCode::Esc if display.active != Some(ScreenId::Home) => {
                KeyAction::Send(SurfaceEvent::Back)
            }
            KeyCode::Char('h') if display.controls.home_button => {
                KeyAction::Send(SurfaceEvent::GoHome)
            }
            KeyCode::Char('q') => KeyAction::Quit,
            _ => KeyAction::Nothing,
        }
    }

    fn upload_key(&mut self, key: KeyEvent) -> KeyAction {
        match key.code {
            KeyCode::Esc => {
                self.upload = None;
                KeyAction::Send(SurfaceEvent::UploadScan { file_name: None })
            }
            KeyCode::Enter => {
                let name = self.upload.take().unwrap_or_default();
                let name = name.trim();
                let file_name = (!name.is_empty()).then(|| name.to_string());
                KeyAction::Send(SurfaceEvent::UploadScan { file_name })
            }
            KeyCode::Backspace => {
                if let Some(name) = self.upload.as_mut() {
                    name.pop();
                }
                KeyAction::Nothing
            }
            KeyCode::Char(c) => {
                if let Some(name) = self.upload.as_mut() {
                    name.push(c);
                }
                KeyAction::Nothing
            }
            _ => KeyAction::Nothing,
        }
    }

    fn chat_key(&mut self, key: KeyEvent, display: &DisplayState) -> KeyAction {
        match key.code {
            KeyCode::Esc => KeyAction::Send(SurfaceEvent::ToggleChat),
            KeyCode::Enter => {
                if self.chat.trim().is_empty() {
                    return KeyAction::Nothing;
                }
                let text = std::mem::take(&mut self.chat);
                KeyAction::Send(SurfaceEvent::ChatSend { text })
            }
            KeyCode::Char(c @ '1'..='9') if self.chat.is_empty() => {
                let index = c as usize - '1' as usize;
                match display.chat.quick_actions.get(index) {
                    Some(action) => KeyAction::Send(SurfaceEvent::ChatQuick {
                        text: action.clone(),
                    }),
                    None => {
                        self.chat.push(c);
                        KeyAction::Nothing
                    }
                }
            }
            KeyCode::Char(c) => {
                self.chat.push(c);
                KeyAction::Nothing
            }
            KeyCode::Backspace => {
                self.chat.pop();
                KeyAction::Nothing
            }
            KeyCode::Up => self.scroll_chat(-1),
            KeyCode::Down => self.scroll_chat(1),
            KeyCode::PageUp => self.scroll_chat(-CHAT_PAGE),
            KeyCode::PageDown => self.scroll_chat(CHAT_PAGE),
            KeyCode::End => {
                self.chat_scroll.scroll_to_bottom();
                KeyAction::Nothing
            }
            _ => KeyAction::Nothing,
        }
    }

    fn scroll_chat(&mut self, delta: i32) -> KeyAction {
        self.chat_scroll.scroll(delta);
        KeyAction::Nothing
    }

    fn landing_key(key: KeyEvent, display: &DisplayState) -> Option<KeyAction> {
        let event = match key.code {
            KeyCode::Enter => SurfaceEvent::Navigate {
                screen: ScreenId::Home,
            },
            KeyCode::Char('s') => SurfaceEvent::Navigate {
                screen: ScreenId::Signup,
            },
            KeyCode::Char('a') if display.controls.back_to_app => SurfaceEvent::BackToApp,
            _ => return None,
        };
        Some(KeyAction::Send(event))
    }

    fn signup_key(&mut self, key: KeyEvent) -> Option<KeyAction> {
        let form = &mut self.signup;
        match key.code {
            KeyCode::Tab | KeyCode::Down => form.focus = form.focus.next(),
            KeyCode::BackTab | KeyCode::Up => form.focus = form.focus.prev(),
            KeyCode::Enter => return Some(KeyAction::Send(form.submit())),
            KeyCode::Backspace => {
                form.field_mut().pop();
            }
            KeyCode::Char(c) => {
                if form.focus != SignupField::Mobile
                    || (c.is_ascii_digit() && form.mobile.len() < MOBILE_DIGITS)
                {
                    form.field_mut().push(c);
                }
            }
            _ => return None,
        }
        Some(KeyAction::Nothing)
    }

    fn home_key(&mut self, key: KeyEvent) -> Option<KeyAction> {
        let count = WasteTypeId::ALL.len();
        match key.code {
            KeyCode::Left | KeyCode::Up => {
                self.home_cursor = (self.home_cursor + count - 1) % count;
            }
            KeyCode::Right | KeyCode::Down => {
                self.home_cursor = (self.home_cursor + 1) % count;
            }
            KeyCode::Char(c @ '1'..='4') => {
                self.home_cursor = c as usize - '1' as usize;
                return Some(self.select());
            }
            KeyCode::Enter | KeyCode::Char(' ') => return Some(self.select()),
            KeyCode::Char('m') => {
                return Some(KeyAction::Send(SurfaceEvent::Navigate {
                    screen: ScreenId::Map,
                }))
            }
            KeyCode::Char('v') => {
                return Some(KeyAction::Send(SurfaceEvent::Navigate {
                    screen: ScreenId::History,
                }))
            }
            _ => return None,
        }
        Some(KeyAction::Nothing)
    }

    fn select(&self) -> KeyAction {
        KeyAction::Send(SurfaceEvent::SelectWaste {
            waste: self.highlighted(),
        })
    }

    fn map_key(key: KeyEvent) -> Option<KeyAction> {
        let event = match key.code {
            KeyCode::Char('l') => SurfaceEvent::ToggleCentersList,
            KeyCode::Enter | KeyCode::Char('s') => SurfaceEvent::Navigate {
                screen: ScreenId::Scanning,
            },
            _ => return None,
        };
        Some(KeyAction::Send(event))
    }

    fn scanning_key(&mut self, key: KeyEvent) -> Option<KeyAction> {
        match key.code {
            KeyCode::Enter | KeyCode::Char('c') => Some(KeyAction::Send(SurfaceEvent::CaptureScan)),
            KeyCode::Char('u') => {
                self.upload = Some(String::new());
                Some(KeyAction::Nothing)
            }
            _ => None,
        }
    }

    fn result_key(key: KeyEvent, display: &DisplayState) -> Option<KeyAction> {
        if key.code != KeyCode::Enter {
            return None;
        }
        let action = match display.result_stage() {
            ResultStage::Detection => KeyAction::Send(SurfaceEvent::ShowNatureReaction),
            ResultStage::Nature => {
                let ready = display
                    .nature
                    .as_ref()
                    .is_some_and(|n| n.continue_visible());
                if ready {
                    KeyAction::Send(SurfaceEvent::ShowImpact)
                } else {
                    KeyAction::Nothing
                }
            }
            ResultStage::Impact | ResultStage::Empty => KeyAction::Send(SurfaceEvent::GoHome),
            ResultStage::Pending => KeyAction::Nothing,
        };
        Some(action)
    }

    fn history_key(key: KeyEvent) -> Option<KeyAction> {
        (key.code == KeyCode::Enter).then_some(KeyAction::Send(SurfaceEvent::GoHome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecobin_core::ControllerMessage;
    use pretty_assertions::assert_eq;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn on(screen: ScreenId) -> DisplayState {
        let mut display = DisplayState::new();
        display.apply_message(ControllerMessage::ScreenActivated { screen });
        display
    }

    #[test]
    fn test_escape_goes_back_except_on_home() {
        let mut input = InputState::new();
        assert_eq!(
            input.handle_key(press(KeyCode::Esc), &on(ScreenId::Map)),
            KeyAction::Send(SurfaceEvent::Back)
        );
        assert_eq!(
            input.handle_key(press(KeyCode::Esc), &on(ScreenId::Home)),
            KeyAction::Nothing
        );
    }

    #[test]
    fn test_home_number_selects() {
        let mut input = InputState::new();
        assert_eq!(
            input.handle_key(press(KeyCode::Char('3')), &on(ScreenId::Home)),
            KeyAction::Send(SurfaceEvent::SelectWaste {
                waste: WasteTypeId::Laptop
            })
        );

        input.handle_key(press(KeyCode::Left), &on(ScreenId::Home));
        assert_eq!(input.highlighted(), WasteTypeId::Battery);
    }

    #[test]
    fn test_signup_mobile_accepts_digits_only() {
        let mut input = InputState::new();
        let display = on(ScreenId::Signup);
        for c in "98a76543210999".chars() {
            input.handle_key(press(KeyCode::Char(c)), &display);
        }
        assert_eq!(input.signup.mobile, "9876543210");

        input.handle_key(press(KeyCode::Tab), &display);
        input.handle_key(press(KeyCode::Char('q')), &display);
        assert_eq!(input.signup.password, "q");

        assert_eq!(
            input.handle_key(press(KeyCode::Enter), &display),
            KeyAction::Send(SurfaceEvent::Signup {
                mobile: "9876543210".into(),
                password: "q".into(),
                confirm_password: String::new(),
            })
        );
    }

    #[test]
    fn test_upload_prompt() {
        let mut input = InputState::new();
        let display = on(ScreenId::Scanning);
        input.handle_key(press(KeyCode::Char('u')), &display);
        assert_eq!(input.upload, Some(String::new()));

        // Quit keys are typed into the prompt
        input.handle_key(press(KeyCode::Char('q')), &display);
        assert_eq!(
            input.handle_key(press(KeyCode::Enter), &display),
            KeyAction::Send(SurfaceEvent::UploadScan {
                file_name: Some("q".into())
            })
        );

        input.handle_key(press(KeyCode::Char('u')), &display);
        assert_eq!(
            input.handle_key(press(KeyCode::Esc), &display),
            KeyAction::Send(SurfaceEvent::UploadScan { file_name: None })
        );
    }

    #[test]
    fn test_chat_quick_action_by_number() {
        let mut input = InputState::new();
        let mut display = on(ScreenId::Home);
        display.apply_message(ControllerMessage::ChatVisibility { open: true });
        display.apply_message(ControllerMessage::ChatQuickActions {
            actions: vec!["Can I recycle batteries?".into()],
        });

        assert_eq!(
            input.handle_key(press(KeyCode::Char('1')), &display),
            KeyAction::Send(SurfaceEvent::ChatQuick {
                text: "Can I recycle batteries?".into()
            })
        );

        // No second action, so the digit is typed
        input.handle_key(press(KeyCode::Char('2')), &display);
        assert_eq!(input.chat, "2");

        assert_eq!(
            input.handle_key(press(KeyCode::Enter), &display),
            KeyAction::Send(SurfaceEvent::ChatSend { text: "2".into() })
        );
        assert!(input.chat.is_empty());
    }

    #[test]
    fn test_chat_scroll_keys() {
        let mut input = InputState::new();
        let mut display = on(ScreenId::Home);
        display.apply_message(ControllerMessage::ChatVisibility { open: true });
        input.chat_scroll.scroll_to_bottom();
        input.chat_scroll.layout(30, 10);

        input.handle_key(press(KeyCode::PageUp), &display);
        assert_eq!(input.chat_scroll.scroll_offset, 20 - CHAT_PAGE as usize);
        assert!(!input.chat_scroll.follow);
        input.handle_key(press(KeyCode::Up), &display);
        assert_eq!(input.chat_scroll.scroll_offset, 14);

        input.handle_key(press(KeyCode::End), &display);
        assert!(input.chat_scroll.follow);
        // Arrows never leak to the screen underneath
        assert_eq!(
            input.handle_key(press(KeyCode::Down), &display),
            KeyAction::Nothing
        );
    }

    #[test]
    fn test_result_enter_follows_stage() {
        let mut input = InputState::new();
        let mut display = on(ScreenId::Result);
        assert_eq!(
            input.handle_key(press(KeyCode::Enter), &display),
            KeyAction::Nothing
        );

        display.apply_message(ControllerMessage::EmptyResult {
            reason: "none".into(),
        });
        assert_eq!(
            input.handle_key(press(KeyCode::Enter), &display),
            KeyAction::Send(SurfaceEvent::GoHome)
        );
    }

    #[test]
    fn test_ctrl_c_always_quits() {
        let mut input = InputState::new();
        input.upload = Some(String::new());
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(
            input.handle_key(key, &on(ScreenId::Scanning)),
            KeyAction::Quit
        );
    }
}
