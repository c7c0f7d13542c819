use ratatui::style::{Color, Modifier, Style};

pub struct Theme {
    pub focus_border: Color,
    pub text: Color,
    pub text_secondary: Color,
    pub selection_fg: Color,

    // Specific components
    pub tab_highlight: Style,
    pub phase_title: Style,
    pub phase_progress: Style,
    pub task_done: Style,
    pub task_open: Style,
    pub task_hours: Style,
    pub task_description: Style,
    pub commit_hash: Style,
    pub commit_date: Style,
    pub table_header: Style,
    pub footer: Style,
    pub status_info: Style,
    pub status_error: Style,
    pub popup_title: Style,
    pub popup_border: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            focus_border: Color::Cyan,
            text: Color::White,
            text_secondary: Color::Gray,
            selection_fg: Color::Yellow,

            tab_highlight: Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            phase_title: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            phase_progress: Style::default().fg(Color::Green),
            task_done: Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT),
            task_open: Style::default().fg(Color::White),
            task_hours: Style::default().fg(Color::Magenta),
            task_description: Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
            commit_hash: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            commit_date: Style::default().fg(Color::Magenta),
            table_header: Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            footer: Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
            status_info: Style::default().fg(Color::Green),
            status_error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            popup_title: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            popup_border: Style::default().fg(Color::Magenta).bg(Color::Black),
        }
    }
}
