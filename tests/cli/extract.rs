use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;

use crate::CliTest;

const VIEWS: &str = r#"# I18N: Page title
title = _('Welcome')
count = ngettext('%d file', '%d files', n)
"#;

/// Syntax error positions come from the parser's error recovery.
const SYNTAX_ERROR_FILTERS: [(&str, &str); 1] =
    [(r"(\w+\.py):(\d+):\d+: .*", "$1:$2:[COLUMN]: [MESSAGE]")];

#[test]
fn test_text_output() -> Result<()> {
    let test = CliTest::with_file("app/views.py", VIEWS)?;

    assert_cmd_snapshot!(test.extract_command(), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    app/views.py:2:9: "Welcome"
    app/views.py:3:9: "%d file"
      = plural: "%d files"
      = flags: python-format
    ✓ Extracted 2 messages from 1 file

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_no_python_files() -> Result<()> {
    let test = CliTest::with_file("README.md", "_('not python')")?;

    assert_cmd_snapshot!(test.extract_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Extracted 0 messages from 0 files

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_add_comments() -> Result<()> {
    let test = CliTest::with_file("app/views.py", VIEWS)?;

    let mut cmd = test.extract_command();
    cmd.arg("--add-comments");
    assert_cmd_snapshot!(cmd, @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    app/views.py:2:9: "Welcome"
      = comment: I18N: Page title
    app/views.py:3:9: "%d file"
      = plural: "%d files"
      = flags: python-format
    ✓ Extracted 2 messages from 1 file

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_comment_tag() -> Result<()> {
    let test = CliTest::with_file("app/views.py", VIEWS)?;

    let mut cmd = test.extract_command();
    cmd.args(["--comment-tag", "I18N:"]);
    assert_cmd_snapshot!(cmd, @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    app/views.py:2:9: "Welcome"
      = comment: Page title
    app/views.py:3:9: "%d file"
      = plural: "%d files"
      = flags: python-format
    ✓ Extracted 2 messages from 1 file

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_json_output() -> Result<()> {
    let test = CliTest::with_file("app/views.py", VIEWS)?;

    let mut cmd = test.extract_command();
    cmd.args(["--format", "json"]);
    assert_cmd_snapshot!(cmd, @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    [
      {
        "msgctxt": null,
        "msgid": "Welcome",
        "msgid_plural": null,
        "flags": [],
        "comment": "",
        "location": {
          "filename": "app/views.py",
          "line": 2,
          "column": 9
        },
        "domain": null
      },
      {
        "msgctxt": null,
        "msgid": "%d file",
        "msgid_plural": "%d files",
        "flags": [
          "python-format"
        ],
        "comment": "",
        "location": {
          "filename": "app/views.py",
          "line": 3,
          "column": 9
        },
        "domain": null
      }
    ]

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_pot_output_to_file() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("a.py", "_('Save')\n")?;
    test.write_file("b.py", "x = 1\n_('Save')\npgettext('menu', 'Save')\n")?;

    let mut cmd = test.extract_command();
    cmd.args(["--format", "pot", "-o", "messages.pot"]);
    assert_cmd_snapshot!(cmd, @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Wrote 3 messages to messages.pot

    ----- stderr -----
    ");

    let pot = test.read_file("messages.pot")?;
    insta::with_settings!({filters => vec![(r"pyglot \d+\.\d+\.\d+", "pyglot [VERSION]")]}, {
        insta::assert_snapshot!(pot, @r#"
        # Translations template.
        #, fuzzy
        msgid ""
        msgstr ""
        "Project-Id-Version: PACKAGE VERSION\n"
        "Report-Msgid-Bugs-To: \n"
        "MIME-Version: 1.0\n"
        "Content-Type: text/plain; charset=UTF-8\n"
        "Content-Transfer-Encoding: 8bit\n"
        "Generated-By: pyglot [VERSION]\n"

        #: a.py:1 b.py:2
        msgid "Save"
        msgstr ""

        #: b.py:3
        msgctxt "menu"
        msgid "Save"
        msgstr ""
        "#);
    });

    Ok(())
}

#[test]
fn test_syntax_error_aborts_run() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("a.py", "_('fine')\n")?;
    test.write_file("broken.py", "_('a' 1)")?;

    insta::with_settings!({filters => SYNTAX_ERROR_FILTERS.to_vec()}, {
        assert_cmd_snapshot!(test.extract_command(), @r"
        success: false
        exit_code: 2
        ----- stdout -----

        ----- stderr -----
        error: broken.py:1:[COLUMN]: [MESSAGE]
        ");
    });

    Ok(())
}

#[test]
fn test_unterminated_string_aborts_run() -> Result<()> {
    let test = CliTest::with_file("broken.py", "_('oops)")?;

    insta::with_settings!({filters => SYNTAX_ERROR_FILTERS.to_vec()}, {
        assert_cmd_snapshot!(test.extract_command(), @r"
        success: false
        exit_code: 2
        ----- stdout -----

        ----- stderr -----
        error: broken.py:1:[COLUMN]: [MESSAGE]
        ");
    });

    Ok(())
}

#[test]
fn test_first_broken_file_in_path_order_is_reported() -> Result<()> {
    let test = CliTest::new()?;
    for i in 0..8 {
        test.write_file(&format!("broken_{i}.py"), "x = (1 2)")?;
    }

    insta::with_settings!({filters => SYNTAX_ERROR_FILTERS.to_vec()}, {
        assert_cmd_snapshot!(test.extract_command(), @r"
        success: false
        exit_code: 2
        ----- stdout -----

        ----- stderr -----
        error: broken_0.py:1:[COLUMN]: [MESSAGE]
        ");
    });

    Ok(())
}

#[test]
fn test_quote_in_format_spec() -> Result<()> {
    let test = CliTest::with_file(
        "app.py",
        "_('kept')\nlabel = f\"{x:'>10}\"\n_('after')\n",
    )?;

    assert_cmd_snapshot!(test.extract_command(), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    app.py:1:1: "kept"
    app.py:3:1: "after"
    ✓ Extracted 2 messages from 1 file

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_custom_keyword() -> Result<()> {
    let test = CliTest::with_file("forms.py", "label = lazy_gettext('Name')\n")?;

    assert_cmd_snapshot!(test.extract_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Extracted 0 messages from 1 file

    ----- stderr -----
    ");

    let mut cmd = test.extract_command();
    cmd.args(["-k", "lazy_gettext"]);
    assert_cmd_snapshot!(cmd, @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    forms.py:1:9: "Name"
    ✓ Extracted 1 message from 1 file

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_invalid_keyword() -> Result<()> {
    let test = CliTest::with_file("forms.py", "_('Name')\n")?;

    let mut cmd = test.extract_command();
    cmd.args(["-k", "tr:0"]);
    assert_cmd_snapshot!(cmd, @r"
    success: false
    exit_code: 2
    ----- stdout -----

    ----- stderr -----
    error: Invalid keyword specification.: invalid argument position '0' in keyword 'tr:0'
    ");

    Ok(())
}

#[test]
fn test_domain_filter() -> Result<()> {
    let test = CliTest::with_file(
        "app.py",
        "dgettext('mydomain', 'kept')\ndgettext('other', 'dropped')\n_('no domain')\n",
    )?;

    let mut cmd = test.extract_command();
    cmd.args(["--domain", "mydomain"]);
    assert_cmd_snapshot!(cmd, @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    app.py:1:1: "kept"
    app.py:3:1: "no domain"
    ✓ Extracted 2 messages from 1 file

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_lineno_offset() -> Result<()> {
    let test = CliTest::with_file("app.py", "_('word')\n")?;

    let mut cmd = test.extract_command();
    cmd.args(["--lineno", "5"]);
    assert_cmd_snapshot!(cmd, @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    app.py:6:1: "word"
    ✓ Extracted 1 message from 1 file

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_paths_argument() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("app/views.py", "_('app')\n")?;
    test.write_file("scripts/tool.py", "_('script')\n")?;

    let mut cmd = test.extract_command();
    cmd.arg("app");
    assert_cmd_snapshot!(cmd, @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    app/views.py:1:1: "app"
    ✓ Extracted 1 message from 1 file

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_output_is_ordered_by_path() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("c.py", "_('c')\n")?;
    test.write_file("a.py", "_('a')\n")?;
    test.write_file("b/z.py", "_('z')\n")?;

    assert_cmd_snapshot!(test.extract_command(), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    a.py:1:1: "a"
    b/z.py:1:1: "z"
    c.py:1:1: "c"
    ✓ Extracted 3 messages from 3 files

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_config_file() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".pyglotrc.json",
        r#"{
         "keywords": ["lazy_gettext"],
         "commentTag": "NOTE:",
         "ignores": ["**/migrations/**"]
     }"#,
    )?;
    test.write_file(
        "app/forms.py",
        "# NOTE: Form label\nlabel = lazy_gettext('Name')\n",
    )?;
    test.write_file("app/migrations/0001_initial.py", "_('Migration')\n")?;

    assert_cmd_snapshot!(test.extract_command(), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    app/forms.py:2:9: "Name"
      = comment: Form label
    ✓ Extracted 1 message from 1 file

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_invalid_config_file() -> Result<()> {
    let test = CliTest::with_file(".pyglotrc.json", r#"{ "ignores": ["[invalid"] }"#)?;

    insta::with_settings!({filters => vec![(r#""\[invalid": .*"#, r#""[invalid": [GLOB ERROR]"#)]}, {
        assert_cmd_snapshot!(test.extract_command(), @r#"
        success: false
        exit_code: 2
        ----- stdout -----

        ----- stderr -----
        error: Invalid glob pattern in 'ignores': "[invalid": [GLOB ERROR]
        "#);
    });

    Ok(())
}
