//! Terminal view: turns entities into styled lines and lays out the three
//! display regions on a ratzilla DOM terminal.

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph};
use ratzilla::ratatui::Frame;

use crate::config::EngineConfig;
use crate::input::{is_narrow_layout, ClickState};
use crate::render::{EntityData, Region, View};
use crate::snapshot::ResourceAmount;
use crate::store::SessionState;
use crate::sync::ClickTag;
use crate::widgets::ClickableList;

// ── Action IDs ──────────────────────────────────────────────────
pub const RETRY_BOOTSTRAP: u16 = 1;
/// Entity rows: base + position across all regions in display order.
pub const ENTITY_BASE: u16 = 100;

/// Format `value` with a fixed number of decimals.
pub fn format_fixed(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

/// A rendered entity.
#[derive(Clone, Debug)]
pub struct EntityLine {
    pub tag: ClickTag,
    pub line: Line<'static>,
    /// Index of the span holding the displayed amount (resources only).
    amount_span: Option<usize>,
}

impl EntityLine {
    pub fn text(&self) -> String {
        self.line
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowHandle {
    region: Region,
    index: usize,
}

#[derive(Clone, Debug)]
struct Notice {
    text: String,
    until: f64,
}

pub struct TerminalView {
    amount_decimals: usize,
    cost_decimals: usize,
    income_decimals: usize,
    resources: Vec<EntityLine>,
    buildings: Vec<EntityLine>,
    upgrades: Vec<EntityLine>,
    notice: Option<Notice>,
}

impl TerminalView {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            amount_decimals: config.amount_decimals,
            cost_decimals: config.cost_decimals,
            income_decimals: config.income_decimals,
            resources: Vec::new(),
            buildings: Vec::new(),
            upgrades: Vec::new(),
            notice: None,
        }
    }

    pub fn rows(&self, region: Region) -> &[EntityLine] {
        match region {
            Region::Resources => &self.resources,
            Region::Buildings => &self.buildings,
            Region::Upgrades => &self.upgrades,
        }
    }

    fn rows_mut(&mut self, region: Region) -> &mut Vec<EntityLine> {
        match region {
            Region::Resources => &mut self.resources,
            Region::Buildings => &mut self.buildings,
            Region::Upgrades => &mut self.upgrades,
        }
    }

    /// Show `text` in the status bar until `now + seconds`.
    pub fn show_notice(&mut self, text: impl Into<String>, now: f64, seconds: f64) {
        self.notice = Some(Notice {
            text: text.into(),
            until: now + seconds,
        });
    }

    pub fn active_notice(&self, now: f64) -> Option<&str> {
        self.notice
            .as_ref()
            .filter(|n| now < n.until)
            .map(|n| n.text.as_str())
    }

    fn costs(&self, label: &str, entries: &[ResourceAmount], decimals: usize) -> Vec<Span<'static>> {
        if entries.is_empty() {
            return Vec::new();
        }
        let list = entries
            .iter()
            .map(|c| format!("{} {}", format_fixed(c.amount, decimals), c.resource))
            .collect::<Vec<_>>()
            .join(", ");
        vec![
            Span::styled(format!("  {}: ", label), Style::default().fg(Color::DarkGray)),
            Span::styled(list, Style::default().fg(Color::White)),
        ]
    }

    // ── Drawing ─────────────────────────────────────────────────

    /// Draw the whole page and register this frame's click targets.
    pub fn draw(&self, f: &mut Frame, session: SessionState, now: f64, cs: &mut ClickState) {
        let size = f.area();
        cs.begin_frame(size.width, size.height);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(3),
            ])
            .split(size);

        let title = Paragraph::new(Line::from(Span::styled(
            "Clicker Quest",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .alignment(Alignment::Center);
        f.render_widget(title, chunks[0]);

        let areas = if is_narrow_layout(size.width) {
            Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(self.resources.len() as u16 + 2),
                    Constraint::Min(3),
                    Constraint::Min(3),
                ])
                .split(chunks[1])
                .to_vec()
        } else {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
                .split(chunks[1]);
            let right = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(columns[1]);
            vec![columns[0], right[0], right[1]]
        };

        let mut action_id = ENTITY_BASE;
        for (region, area) in Region::ALL.iter().zip(areas) {
            action_id = self.draw_region(f, *region, area, action_id, cs);
        }

        self.draw_status(f, chunks[2], session, now, cs);
    }

    fn draw_region(
        &self,
        f: &mut Frame,
        region: Region,
        area: Rect,
        first_action: u16,
        cs: &mut ClickState,
    ) -> u16 {
        let (title, color) = match region {
            Region::Resources => (" Resources ", Color::Green),
            Region::Buildings => (" Buildings (click to build) ", Color::Yellow),
            Region::Upgrades => (" Upgrades (click to buy) ", Color::Magenta),
        };

        let mut cl = ClickableList::new();
        let mut action_id = first_action;
        for row in self.rows(region) {
            cl.push_clickable(row.line.clone(), action_id);
            cs.bind_entity(action_id, row.tag.clone());
            action_id += 1;
        }
        cl.register_targets(area, cs, 1, 1);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(title);
        f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
        action_id
    }

    fn draw_status(
        &self,
        f: &mut Frame,
        area: Rect,
        session: SessionState,
        now: f64,
        cs: &mut ClickState,
    ) {
        let mut cl = ClickableList::new();
        if let Some(text) = self.active_notice(now) {
            cl.push(Line::from(Span::styled(
                text.to_string(),
                Style::default().fg(Color::Yellow),
            )));
        } else if session == SessionState::Unsynced {
            cl.push_clickable(
                Line::from(Span::styled(
                    "Not connected. [R] Retry",
                    Style::default().fg(Color::Red),
                )),
                RETRY_BOOTSTRAP,
            );
        } else {
            cl.push(Line::from(Span::styled(
                "Synced with server",
                Style::default().fg(Color::DarkGray),
            )));
        }
        cl.register_targets(area, cs, 1, 1);

        let status = Paragraph::new(cl.into_lines())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .alignment(Alignment::Center);
        f.render_widget(status, area);
    }
}

impl View for TerminalView {
    type Node = EntityLine;
    type Handle = RowHandle;

    fn render(&mut self, entity: &EntityData<'_>, template: &str) -> EntityLine {
        let name_style = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);
        let mut spans = vec![Span::styled(entity.name().to_string(), name_style)];
        let mut amount_span = None;

        match *entity {
            EntityData::Resource {
                resource,
                displayed,
            } => {
                spans.push(Span::raw(" "));
                amount_span = Some(spans.len());
                spans.push(Span::styled(
                    format_fixed(displayed, self.amount_decimals),
                    Style::default().fg(Color::Cyan),
                ));
                if let Some(maximum) = resource.maximum {
                    spans.push(Span::styled(
                        format!(" / {}", format_fixed(maximum, self.amount_decimals)),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
                let income_color = if resource.income < 0.0 {
                    Color::Red
                } else {
                    Color::Green
                };
                spans.push(Span::styled(
                    format!(
                        " ({}{}/s)",
                        if resource.income < 0.0 { "" } else { "+" },
                        format_fixed(resource.income, self.income_decimals)
                    ),
                    Style::default().fg(income_color),
                ));
            }
            EntityData::Building(building) => {
                spans.push(Span::styled(
                    format!(" x{}", building.owned),
                    Style::default().fg(Color::Yellow),
                ));
                spans.extend(self.costs("cost", &building.cost, self.cost_decimals));
                spans.extend(self.costs("yields/s", &building.income, self.income_decimals));
                if !building.description.is_empty() {
                    spans.push(Span::styled(
                        format!("  {}", building.description),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
            }
            EntityData::Upgrade(upgrade) => {
                if upgrade.purchased() {
                    spans.push(Span::styled(" ✓", Style::default().fg(Color::Green)));
                } else {
                    spans.extend(self.costs("cost", &upgrade.cost, self.cost_decimals));
                }
                if !upgrade.description.is_empty() {
                    spans.push(Span::styled(
                        format!("  {}", upgrade.description),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
            }
        }

        log::trace!("rendered `{}` with template {}", entity.name(), template);
        EntityLine {
            tag: ClickTag::new(entity.kind(), entity.name()),
            line: Line::from(spans),
            amount_span,
        }
    }

    fn clear(&mut self, region: Region) {
        self.rows_mut(region).clear();
    }

    fn append(&mut self, region: Region, node: EntityLine) -> RowHandle {
        let rows = self.rows_mut(region);
        rows.push(node);
        RowHandle {
            region,
            index: rows.len() - 1,
        }
    }

    fn set_displayed(&mut self, handle: &RowHandle, amount: f64) {
        let text = format_fixed(amount, self.amount_decimals);
        let Some(row) = self.rows_mut(handle.region).get_mut(handle.index) else {
            return;
        };
        if let Some(span) = row.amount_span.and_then(|i| row.line.spans.get_mut(i)) {
            span.content = text.into();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{Building, EntityKind, Resource, Upgrade};
    use ratzilla::ratatui::backend::TestBackend;
    use ratzilla::ratatui::Terminal;

    fn view() -> TerminalView {
        TerminalView::new(&EngineConfig::default())
    }

    fn gold() -> Resource {
        Resource {
            name: "gold".into(),
            owned: 10.0,
            income: 0.5,
            maximum: Some(100.0),
        }
    }

    #[test]
    fn fixed_formatting() {
        assert_eq!(format_fixed(20.0, 2), "20.00");
        assert_eq!(format_fixed(0.1234, 3), "0.123");
        assert_eq!(format_fixed(-1.5, 1), "-1.5");
    }

    #[test]
    fn resource_template() {
        let mut v = view();
        let r = gold();
        let node = v.render(
            &EntityData::Resource {
                resource: &r,
                displayed: r.owned,
            },
            "resource",
        );
        assert_eq!(node.text(), "gold 10.00 / 100.00 (+0.500/s)");
        assert_eq!(node.tag, ClickTag::new(EntityKind::Resource, "gold"));
    }

    #[test]
    fn building_template_shows_cost_and_income() {
        let mut v = view();
        let b = Building {
            name: "windmill".into(),
            description: String::new(),
            owned: 2,
            cost: vec![ResourceAmount {
                resource: "wood".into(),
                amount: 12.5,
            }],
            income: vec![ResourceAmount {
                resource: "gold".into(),
                amount: 0.25,
            }],
        };
        let node = v.render(&EntityData::Building(&b), "building");
        assert_eq!(
            node.text(),
            "windmill x2  cost: 12.50 wood  yields/s: 0.250 gold"
        );
    }

    #[test]
    fn building_template_shows_description() {
        let mut v = view();
        let mut b = building("farm");
        b.owned = 1;
        b.description = "grows wheat".into();
        let node = v.render(&EntityData::Building(&b), "building");
        assert_eq!(node.text(), "farm x1  grows wheat");
    }

    #[test]
    fn purchased_upgrade_hides_cost() {
        let mut v = view();
        let u = Upgrade {
            name: "sails".into(),
            description: "faster windmills".into(),
            owned: 1,
            cost: vec![ResourceAmount {
                resource: "gold".into(),
                amount: 50.0,
            }],
        };
        let node = v.render(&EntityData::Upgrade(&u), "upgrade");
        assert_eq!(node.text(), "sails ✓  faster windmills");
    }

    #[test]
    fn set_displayed_rewrites_only_the_amount() {
        let mut v = view();
        let r = gold();
        let node = v.render(
            &EntityData::Resource {
                resource: &r,
                displayed: r.owned,
            },
            "resource",
        );
        let handle = v.append(Region::Resources, node);
        v.set_displayed(&handle, 42.0);
        assert_eq!(
            v.rows(Region::Resources)[0].text(),
            "gold 42.00 / 100.00 (+0.500/s)"
        );
    }

    fn building(name: &str) -> Building {
        Building {
            name: name.into(),
            description: String::new(),
            owned: 0,
            cost: vec![],
            income: vec![],
        }
    }

    fn show(v: &mut TerminalView, resources: &[Resource], buildings: &[Building]) {
        for region in Region::ALL {
            v.clear(region);
        }
        for r in resources {
            let node = v.render(
                &EntityData::Resource {
                    resource: r,
                    displayed: r.owned,
                },
                "resource",
            );
            v.append(Region::Resources, node);
        }
        for b in buildings {
            let node = v.render(&EntityData::Building(b), "building");
            v.append(Region::Buildings, node);
        }
    }

    fn draw(v: &TerminalView, cs: &mut ClickState) {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|f| v.draw(f, SessionState::Synced, 0.0, cs))
            .unwrap();
    }

    /// Action ID of the first target whose bound entity is `name`.
    fn action_of(cs: &ClickState, name: &str) -> u16 {
        cs.targets
            .iter()
            .map(|t| t.action_id)
            .find(|id| cs.entity_for_action(*id).map(|t| t.name.as_str()) == Some(name))
            .unwrap()
    }

    #[test]
    fn drawn_rows_bind_entities_in_display_order() {
        let mut v = view();
        show(&mut v, &[gold()], &[building("windmill")]);
        let mut cs = ClickState::new();
        draw(&v, &mut cs);

        assert_eq!(
            cs.entity_for_action(ENTITY_BASE),
            Some(&ClickTag::new(EntityKind::Resource, "gold"))
        );
        assert_eq!(
            cs.entity_for_action(ENTITY_BASE + 1),
            Some(&ClickTag::new(EntityKind::Building, "windmill"))
        );
        assert_eq!(cs.entity_for_action(ENTITY_BASE + 2), None);
        assert_eq!(cs.entity_for_action(RETRY_BOOTSTRAP), None);
    }

    #[test]
    fn click_resolves_against_the_frame_it_was_made_on() {
        let mut v = view();
        show(&mut v, &[gold()], &[building("windmill"), building("farm")]);
        let mut cs = ClickState::new();
        draw(&v, &mut cs);

        let farm = action_of(&cs, "farm");
        let target = cs.targets.iter().find(|t| t.action_id == farm).unwrap();
        let (col, row) = (target.rect.x, target.rect.y);

        // A sync lands and adds a resource, shifting every later row by one.
        let mut stone = gold();
        stone.name = "stone".into();
        show(&mut v, &[gold(), stone], &[building("windmill"), building("farm")]);

        let hit = cs.hit_test(col, row).unwrap();
        assert_eq!(
            cs.entity_for_action(hit),
            Some(&ClickTag::new(EntityKind::Building, "farm"))
        );

        // The next frame rebinds the new layout.
        draw(&v, &mut cs);
        assert_eq!(
            cs.entity_for_action(ENTITY_BASE + 2),
            Some(&ClickTag::new(EntityKind::Building, "windmill"))
        );
    }

    #[test]
    fn clear_empties_one_region() {
        let mut v = view();
        let r = gold();
        let node = v.render(
            &EntityData::Resource {
                resource: &r,
                displayed: 0.0,
            },
            "resource",
        );
        v.append(Region::Resources, node.clone());
        v.append(Region::Buildings, node);
        v.clear(Region::Resources);
        assert!(v.rows(Region::Resources).is_empty());
        assert_eq!(v.rows(Region::Buildings).len(), 1);
    }

    #[test]
    fn notice_expires() {
        let mut v = view();
        v.show_notice("purchase failed", 10.0, 4.0);
        assert_eq!(v.active_notice(12.0), Some("purchase failed"));
        assert_eq!(v.active_notice(14.0), None);
    }
}
