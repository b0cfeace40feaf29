use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;

use crate::CliTest;

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.command();
    cmd.arg("init");
    assert_cmd_snapshot!(cmd, @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Created .pyglotrc.json

    ----- stderr -----
    ");

    let content = test.read_file(".pyglotrc.json")?;
    insta::assert_snapshot!(content, @r#"
    {
      "ignores": [
        "**/.venv/**",
        "**/venv/**",
        "**/.tox/**",
        "**/node_modules/**"
      ],
      "includes": [
        "."
      ],
      "keywords": [],
      "commentTag": false
    }
    "#);

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".pyglotrc.json", "{}")?;

    let mut cmd = test.command();
    cmd.arg("init");
    assert_cmd_snapshot!(cmd, @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    Error: .pyglotrc.json already exists
    ");
    assert_eq!(test.read_file(".pyglotrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;

    test.command().arg("init").output()?;
    test.write_file("app/views.py", "title = _('Welcome')\n")?;

    assert_cmd_snapshot!(test.extract_command(), @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    app/views.py:1:9: "Welcome"
    ✓ Extracted 1 message from 1 file

    ----- stderr -----
    "#);

    Ok(())
}
