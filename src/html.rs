use crate::render::{ Container, Element, Group, Link };

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn to_html(element: &Element) -> String {
    let mut out = String::new();
    write_element(element, &mut out);
    out
}

fn write_element(element: &Element, out: &mut String) {
    match element {
        Element::Group(group) => write_group(group, out),
        Element::Link(link) => write_link(link, out),
    }
}

fn write_group(group: &Group, out: &mut String) {
    out.push_str(if group.open { "<details open>" } else { "<details>" });
    out.push_str("<summary>");
    out.push_str(&escape_html(&group.title));
    out.push_str("</summary>");
    for child in &group.children {
        write_element(child, out);
    }
    out.push_str("</details>");
}

fn write_link(link: &Link, out: &mut String) {
    out.push_str(
        &format!(
            "<a class=\"{}\" href=\"{}\" target=\"{}\">{}</a>",
            escape_html(&link.class),
            escape_html(&link.href),
            escape_html(&link.target),
            escape_html(&link.label)
        )
    );
}

impl Container {
    pub fn to_html(&self) -> String {
        let mut out = format!("<div id=\"{}\">", escape_html(&self.id));
        for child in &self.children {
            write_element(child, &mut out);
        }
        out.push_str("</div>");
        out
    }
}

/// Standalone document holding `container`.
pub fn page(container: &Container) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<title>Solutions</title>\n");
    html.push_str("</head>\n<body>\n");
    html.push_str(&container.to_html());
    html.push_str("\n</body>\n</html>\n");
    html
}
