//! Asset pipeline for the exported stylesheet, runtime script and media.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use walkdir::WalkDir;

/// Cookie the consent banner stores its choice in.
pub const CONSENT_COOKIE: &str = "cookie_consent";

/// Values the consent cookie may hold.
pub const CONSENT_VALUES: [&str; 2] = ["accepted", "essential"];

/// Days the consent cookie lives.
pub const CONSENT_MAX_AGE_DAYS: u32 = 180;

static MEDIA_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"url\((["']?)/_next/static/media/"#).expect("Invalid media url regex")
});

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// First stylesheet in a directory, by file name.
    pub fn first_stylesheet(dir: &Path) -> Option<PathBuf> {
        let mut sheets: Vec<PathBuf> = fs::read_dir(dir)
            .ok()?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "css"))
            .collect();
        sheets.sort();
        sheets.into_iter().next()
    }

    /// Point font and image URLs at the exported `media/` directory next to the stylesheet.
    pub fn rewrite_css_urls(css: &str) -> String {
        MEDIA_URL_RE.replace_all(css, "url(${1}./media/").into_owned()
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }

    /// The bundled runtime script.
    pub fn runtime_js() -> &'static str {
        RUNTIME_JS
    }

    /// Copy a directory tree verbatim. Returns the number of files copied.
    pub fn copy_dir(src: &Path, dest: &Path) -> io::Result<usize> {
        let mut count = 0;

        for entry in WalkDir::new(src).follow_links(true) {
            let entry = entry.map_err(io::Error::other)?;
            let relative = entry.path().strip_prefix(src).map_err(io::Error::other)?;
            let target = dest.join(relative);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)?;
            } else {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(entry.path(), &target)?;
                count += 1;
            }
        }

        Ok(count)
    }
}

// Attaches behaviour to the hooks the transforms leave in the markup.
const RUNTIME_JS: &str = r#"(function () {
  'use strict';

  var CONSENT_COOKIE = 'cookie_consent';
  var CONSENT_DAYS = 180;
  var DEFAULT_EMAIL = 'hello@greenshield.local';

  function readCookie(name) {
    var prefix = encodeURIComponent(name) + '=';
    var parts = document.cookie.split(';');
    for (var i = 0; i < parts.length; i++) {
      var part = parts[i].trim();
      if (part.indexOf(prefix) === 0) return decodeURIComponent(part.slice(prefix.length));
    }
    return null;
  }

  function writeCookie(name, value, days) {
    document.cookie = encodeURIComponent(name) + '=' + encodeURIComponent(value) +
      '; Path=/; Max-Age=' + Math.floor(days * 86400) + '; SameSite=Lax';
  }

  function rootRel() {
    return location.pathname.split('/').filter(Boolean).length >= 2 ? '../' : './';
  }

  function cookieBanner() {
    var root = document.getElementById('cookie-banner-root');
    if (!root) return;
    var choice = readCookie(CONSENT_COOKIE);
    if (choice === 'accepted' || choice === 'essential') return;

    root.innerHTML =
      '<div class="fixed inset-x-0 bottom-0 z-50 p-4 md:p-6"><div class="mx-auto max-w-4xl">' +
      '<div class="rounded-lg border bg-background/95 shadow-lg"><div class="p-4 md:p-5 flex flex-col md:flex-row gap-4 md:items-center md:justify-between">' +
      '<div class="space-y-1"><p class="font-semibold">Cookies &amp; privacy</p>' +
      '<p class="text-sm text-muted-foreground">We use essential cookies to make this site work, and optional cookies to understand usage. You can choose essential-only or accept all.</p>' +
      '<div class="text-sm"><a href="' + rootRel() + 'cookie-policy/" class="text-primary underline underline-offset-4">Cookie Policy</a></div></div>' +
      '<div class="flex flex-col sm:flex-row gap-2 sm:items-center">' +
      '<button type="button" data-cookie-choice="essential" class="inline-flex items-center justify-center rounded-md text-sm font-medium border border-input bg-background h-10 px-4 py-2">Essential Only</button>' +
      '<button type="button" data-cookie-choice="accepted" class="inline-flex items-center justify-center rounded-md text-sm font-semibold bg-primary text-primary-foreground h-10 px-4 py-2">Accept All</button>' +
      '</div></div></div></div></div>';

    root.addEventListener('click', function (e) {
      var btn = e.target.closest && e.target.closest('button[data-cookie-choice]');
      if (!btn) return;
      var value = btn.getAttribute('data-cookie-choice');
      if (value !== 'accepted' && value !== 'essential') return;
      writeCookie(CONSENT_COOKIE, value, CONSENT_DAYS);
      root.innerHTML = '';
    });
  }

  function tabs() {
    document.querySelectorAll('[role="tablist"]').forEach(function (tablist) {
      var items = Array.prototype.slice.call(tablist.querySelectorAll('[role="tab"]'));
      if (items.length === 0) return;

      function activate(tab) {
        items.forEach(function (t) {
          var active = t === tab;
          t.setAttribute('aria-selected', active ? 'true' : 'false');
          t.setAttribute('data-state', active ? 'active' : 'inactive');
          t.tabIndex = active ? 0 : -1;
          var panel = document.getElementById(t.getAttribute('aria-controls') || '');
          if (!panel) return;
          panel.hidden = !active;
          panel.setAttribute('data-state', active ? 'active' : 'inactive');
        });
      }

      tablist.addEventListener('click', function (e) {
        var tab = e.target.closest && e.target.closest('[role="tab"]');
        if (tab && tablist.contains(tab)) activate(tab);
      });

      activate(items.filter(function (t) {
        return t.getAttribute('aria-selected') === 'true';
      })[0] || items[0]);
    });
  }

  function toggle(trigger) {
    var panel = document.getElementById(trigger.getAttribute('aria-controls') || '');
    if (!panel) return;
    var open = trigger.getAttribute('aria-expanded') !== 'true';
    trigger.setAttribute('aria-expanded', open ? 'true' : 'false');
    trigger.setAttribute('data-state', open ? 'open' : 'closed');
    panel.hidden = !open;
    panel.setAttribute('data-state', open ? 'open' : 'closed');
  }

  function accordions() {
    document.addEventListener('click', function (e) {
      var trigger = e.target.closest &&
        e.target.closest('button[aria-controls][aria-expanded]:not([role="tab"]):not([role="combobox"])');
      if (trigger) toggle(trigger);
    });
  }

  function escapeHtml(text) {
    return String(text)
      .replace(/&/g, '&amp;')
      .replace(/</g, '&lt;')
      .replace(/>/g, '&gt;')
      .replace(/"/g, '&quot;')
      .replace(/'/g, '&#39;');
  }

  function faqTopics() {
    var dataEl = document.getElementById('faq-data');
    var list = document.querySelector('[data-faq-list]');
    var buttons = document.querySelector('[data-faq-topics]');
    if (!dataEl || !list || !buttons) return;

    // The payload is entity-escaped and script text is never decoded by the parser.
    var decoder = document.createElement('textarea');
    decoder.innerHTML = dataEl.textContent || '{}';

    var table;
    try {
      table = JSON.parse(decoder.value);
    } catch (err) {
      return;
    }

    var state = { selected: list.getAttribute('data-faq-active') };
    var activeClass = 'bg-primary text-primary-foreground hover:bg-primary/90';
    var outlineClass = 'border border-input bg-background hover:bg-accent hover:text-accent-foreground';

    function render() {
      var items = Array.isArray(table[state.selected]) ? table[state.selected] : [];
      list.innerHTML = items.map(function (item, index) {
        var id = 'faq-' + index + '-content';
        return '<div class="border-b" data-faq-item><h3 class="flex">' +
          '<button type="button" class="flex flex-1 items-center justify-between py-4 font-medium transition-all hover:underline text-left text-lg" aria-expanded="false" aria-controls="' + id + '">' +
          '<span>' + escapeHtml(item.question) + '</span><span class="ml-4 text-muted-foreground">+</span></button></h3>' +
          '<div id="' + id + '" class="overflow-hidden text-sm transition-all" hidden>' +
          '<div class="pb-4 pt-0 text-muted-foreground text-base">' + escapeHtml(item.answer) + '</div></div></div>';
      }).join('');
      list.setAttribute('data-faq-active', state.selected);

      buttons.querySelectorAll('button[data-faq-topic]').forEach(function (btn) {
        var active = btn.getAttribute('data-faq-topic') === state.selected;
        btn.classList.remove.apply(btn.classList, (active ? outlineClass : activeClass).split(' '));
        btn.classList.add.apply(btn.classList, (active ? activeClass : outlineClass).split(' '));
      });
    }

    buttons.addEventListener('click', function (e) {
      var btn = e.target.closest && e.target.closest('button[data-faq-topic]');
      if (!btn) return;
      state.selected = btn.getAttribute('data-faq-topic');
      render();
    });
  }

  function mailtoForms() {
    document.querySelectorAll('form[data-mailto-form]').forEach(function (form) {
      form.addEventListener('submit', function (e) {
        e.preventDefault();
        var email = form.getAttribute('data-mailto-email') || DEFAULT_EMAIL;
        var data = new FormData(form);
        var field = function (name) { return String(data.get(name) || '').trim(); };
        var service = field('service');
        var subject = 'Website inquiry' + (service ? ' - ' + service : '');
        var body = [
          'Name: ' + (field('name') || '-'),
          'Phone: ' + (field('phone') || '-'),
          'Email: ' + (field('email') || '-'),
          'Service: ' + (service || '-'),
          '',
          field('message')
        ].join('\n');
        window.location.href = 'mailto:' + encodeURIComponent(email) +
          '?subject=' + encodeURIComponent(subject) + '&body=' + encodeURIComponent(body);
      });
    });
  }

  document.addEventListener('DOMContentLoaded', function () {
    cookieBanner();
    tabs();
    accordions();
    faqTopics();
    mailtoForms();
  });
})();
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn rewrites_media_urls() {
        let css = r#"@font-face{src:url(/_next/static/media/a.woff2) format("woff2")}.x{background:url("/_next/static/media/b.png")}.y{background:url(/images/c.png)}"#;

        assert_eq!(
            AssetPipeline::rewrite_css_urls(css),
            r#"@font-face{src:url(./media/a.woff2) format("woff2")}.x{background:url("./media/b.png")}.y{background:url(/images/c.png)}"#
        );
    }

    #[test]
    fn minifies_css() {
        let css = r#"
.button {
    background-color: blue;
    padding: 10px;
}
        "#;

        let minified = AssetPipeline::minify_css(css).unwrap();

        assert!(!minified.contains('\n'));
        assert!(minified.contains(".button"));
    }

    #[test]
    fn picks_first_stylesheet_by_name() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("b.css"), "b").unwrap();
        fs::write(temp.path().join("a.css"), "a").unwrap();
        fs::write(temp.path().join("0.map"), "m").unwrap();

        let sheet = AssetPipeline::first_stylesheet(temp.path()).unwrap();

        assert_eq!(sheet.file_name().unwrap(), "a.css");
        assert!(AssetPipeline::first_stylesheet(&temp.path().join("missing")).is_none());
    }

    #[test]
    fn copies_nested_directories() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("images");
        fs::create_dir_all(src.join("team")).unwrap();
        fs::write(src.join("logo.png"), [1u8, 2, 3]).unwrap();
        fs::write(src.join("team").join("a.jpg"), [4u8]).unwrap();

        let dest = temp.path().join("out").join("images");
        let count = AssetPipeline::copy_dir(&src, &dest).unwrap();

        assert_eq!(count, 2);
        assert_eq!(fs::read(dest.join("logo.png")).unwrap(), vec![1, 2, 3]);
        assert!(dest.join("team").join("a.jpg").exists());
    }

    #[test]
    fn runtime_uses_page_hooks() {
        let js = AssetPipeline::runtime_js();

        assert!(js.contains(&format!("'{CONSENT_COOKIE}'")));
        for value in CONSENT_VALUES {
            assert!(js.contains(&format!("'{value}'")));
        }
        assert!(js.contains(&format!("CONSENT_DAYS = {CONSENT_MAX_AGE_DAYS}")));
        for hook in [
            "cookie-banner-root",
            "faq-data",
            "data-faq-list",
            "data-faq-topics",
            "data-faq-active",
            "data-mailto-form",
            "data-mailto-email",
            "aria-expanded",
            "role=\"tablist\"",
        ] {
            assert!(js.contains(hook), "runtime does not use {hook}");
        }
    }

    #[test]
    fn runtime_decodes_faq_payload_before_parsing() {
        let js = AssetPipeline::runtime_js();

        let decode = js
            .find("decoder.innerHTML = dataEl.textContent")
            .expect("payload is not entity-decoded");
        let parse = js
            .find("JSON.parse(decoder.value)")
            .expect("decoded payload is not parsed");

        assert!(decode < parse);
        assert!(!js.contains("JSON.parse(dataEl.textContent"));
    }
}
