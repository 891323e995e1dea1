use crate::render::{ Container, Element };
use crossterm::queue;
use crossterm::style::{ Color, Print, ResetColor, SetForegroundColor };
use std::io::{ self, Write };

/// Prints rendered elements as an indented tree. Groups are green and links
/// blue, with the link target dimmed after the label.
pub struct TreePrinter {
    pub color: bool,
}

impl TreePrinter {
    pub fn print_container<W: Write>(&self, out: &mut W, container: &Container) -> io::Result<()> {
        for child in &container.children {
            self.print_element(out, child, 0)?;
        }
        out.flush()
    }

    fn print_element<W: Write>(&self, out: &mut W, element: &Element, level: usize) -> io::Result<()> {
        let indent = "  ".repeat(level);
        match element {
            Element::Group(group) => {
                let marker = if group.open { "▾" } else { "▸" };
                self.colored(out, Color::Green, &format!("{}{} {}/", indent, marker, group.title))?;
                writeln!(out)?;
                for child in &group.children {
                    self.print_element(out, child, level + 1)?;
                }
            }
            Element::Link(link) => {
                self.colored(out, Color::Blue, &format!("{}{}", indent, link.label))?;
                self.colored(out, Color::DarkGrey, &format!("  {}", link.href))?;
                writeln!(out)?;
            }
        }
        Ok(())
    }

    fn colored<W: Write>(&self, out: &mut W, color: Color, text: &str) -> io::Result<()> {
        if self.color {
            queue!(out, SetForegroundColor(color), Print(text), ResetColor)
        } else {
            write!(out, "{}", text)
        }
    }
}
