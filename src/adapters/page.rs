//! HTML page shell around a rendered widget tree.

use serde::Serialize;
use tera::{Context, Tera};

const FORM_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8" />
<title>{{ title }}</title>
</head>
<body>
<h1>{{ title }}</h1>
{% if description %}<p class="description">{{ description }}</p>{% endif %}
<form method="post" action="/forms/{{ form_name }}" id="param_form" data-session="{{ session_id }}">
<div id="param_container">{{ content | safe }}</div>
<input type="submit" value="Submit" />
<input type="reset" value="Reset" />
</form>
<script>
(function() {
    var form = document.getElementById("param_form");
    var container = document.getElementById("param_container");
    var events = "/forms/{{ form_name }}/sessions/" + form.dataset.session + "/events";
    function patch(body) {
        if (body.html && body.table_id) {
            var table = document.getElementById(body.table_id);
            if (table) { table.insertAdjacentHTML("beforeend", body.html); }
        } else if (body.row_id) {
            var row = document.getElementById(body.row_id);
            if (row) { row.parentNode.removeChild(row); }
        }
        (body.cleared || []).forEach(function(id) {
            var table = document.getElementById(id);
            if (table) { table.innerHTML = ""; }
        });
    }
    function send(event) {
        return fetch(events, {
            method: "POST",
            headers: {"Content-Type": "application/json"},
            body: JSON.stringify(event)
        }).then(function(r) { return r.json(); }).then(patch);
    }
    container.addEventListener("click", function(ev) {
        var id = ev.target.id || "";
        if (id.indexOf("add_element_") === 0) {
            ev.preventDefault();
            send({action: "add", array: id.substring(12)});
        } else if (id.indexOf("remove_element_") === 0) {
            ev.preventDefault();
            var rest = id.substring(15);
            var cut = rest.lastIndexOf("_");
            send({action: "remove", array: rest.substring(0, cut), index: parseInt(rest.substring(cut + 1), 10)});
        }
    });
    form.addEventListener("reset", function() { send({action: "reset"}); });
})();
</script>
</body>
</html>
"#;

/// Values the page template needs.
#[derive(Debug, Serialize)]
pub struct FormPage<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub form_name: &'a str,
    pub session_id: &'a str,
    pub content: String,
}

pub struct PageRenderer {
    tera: Tera,
}

impl PageRenderer {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_template("form.html", FORM_PAGE)?;
        Ok(Self { tera })
    }

    pub fn render_form(&self, page: &FormPage<'_>) -> Result<String, tera::Error> {
        let context = Context::from_serialize(page)?;
        self.tera.render("form.html", &context)
    }
}
