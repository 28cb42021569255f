//! Fixed file set generated when no template directory resolves.

pub struct BuiltinFile {
    /// Path relative to the destination root, `/`-separated.
    pub path: &'static str,
    pub template: &'static str,
}

pub const SCRIPTS_DIR: &str = "tools";

pub fn files() -> &'static [BuiltinFile] {
    &[
        BuiltinFile {
            path: "__name_replace__.nuspec",
            template: NUSPEC,
        },
        BuiltinFile {
            path: "tools/install.ps1",
            template: INSTALL_PS1,
        },
        BuiltinFile {
            path: "tools/beforemodify.ps1",
            template: BEFORE_MODIFY_PS1,
        },
        BuiltinFile {
            path: "tools/uninstall.ps1",
            template: UNINSTALL_PS1,
        },
        BuiltinFile {
            path: "tools/LICENSE.txt",
            template: LICENSE_TXT,
        },
        BuiltinFile {
            path: "tools/VERIFICATION.txt",
            template: VERIFICATION_TXT,
        },
        BuiltinFile {
            path: "ReadMe.md",
            template: README_MD,
        },
        BuiltinFile {
            path: "_TODO.txt",
            template: TODO_TXT,
        },
    ]
}

const NUSPEC: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<package xmlns="http://schemas.microsoft.com/packaging/2015/06/nuspec.xsd">
  <metadata>
    <id>[[PackageNameLower]]</id>
    <version>[[PackageVersion]]</version>
    <!-- <packageSourceUrl>https://github.com/[[MaintainerRepo]]</packageSourceUrl> -->
    <owners>[[MaintainerName]]</owners>
    <title>[[PackageName]] (Install)</title>
    <authors>__REPLACE_AUTHORS_OF_SOFTWARE_COMMA_SEPARATED__</authors>
    <projectUrl>https://_Software_Location_REMOVE_OR_FILL_OUT_</projectUrl>
    <!-- <licenseUrl>Software License Location __REMOVE_OR_FILL_OUT__</licenseUrl> -->
    <requireLicenseAcceptance>false</requireLicenseAcceptance>
    <tags>[[PackageNameLower]] SPACE_SEPARATED</tags>
    <summary>__REPLACE__</summary>
    <description>__REPLACE__MarkDown_Okay</description>
  </metadata>
  <files>
    <file src="tools\**" target="tools" />
  </files>
</package>
"#;

const INSTALL_PS1: &str = r#"$ErrorActionPreference = 'Stop'
$toolsDir   = "$(Split-Path -parent $MyInvocation.MyCommand.Definition)"
$url        = '[[Url]]'
$url64      = '[[Url64]]'

$packageArgs = @{
  packageName   = $env:PackageName
  unzipLocation = $toolsDir
  fileType      = '[[InstallerType]]'
  url           = $url
  url64bit      = $url64

  softwareName  = '[[PackageName]]*'

  checksum      = '[[Checksum]]'
  checksumType  = '[[ChecksumType]]'
  checksum64    = '[[Checksum64]]'
  checksumType64= '[[ChecksumType64]]'

  silentArgs    = '[[SilentArgs]]'
  validExitCodes= @(0)
}

Install-Package @packageArgs
"#;

const BEFORE_MODIFY_PS1: &str = r#"# Runs before an upgrade or uninstall of [[PackageName]].
# Stop services or processes that would lock files here.
"#;

const UNINSTALL_PS1: &str = r#"$ErrorActionPreference = 'Stop'

$packageArgs = @{
  packageName   = $env:PackageName
  softwareName  = '[[PackageName]]*'
  fileType      = '[[InstallerType]]'
  silentArgs    = '[[SilentArgs]]'
  validExitCodes= @(0)
}

Uninstall-Package @packageArgs
"#;

const LICENSE_TXT: &str = r#"Note: Include this file if including binaries you have the right to distribute.
Otherwise delete this file.

===DELETE ABOVE THIS LINE AND THIS LINE===

From: <insert applicable license url here>

LICENSE

<Insert License Here>
"#;

const VERIFICATION_TXT: &str = r#"Note: Include this file if including binaries you have the right to distribute.
Otherwise delete this file.

===DELETE ABOVE THIS LINE AND THIS LINE===

VERIFICATION
Verification is intended to assist moderators and the community in verifying
that this package's contents are trustworthy.

<Include details of how to verify checksum contents>
"#;

const README_MD: &str = r#"## Summary
How do I create packages? Start with `packsmith new [[PackageName]]`, fill in
the descriptor, then run `packsmith validate` on it before packing.

## Files
* `__name_replace__.nuspec` is renamed to the package id when packing.
* `tools/install.ps1` runs on install.
* `tools/uninstall.ps1` runs on uninstall.
* `tools/beforemodify.ps1` runs before upgrade and uninstall.
"#;

const TODO_TXT: &str = r#"TODO

1. Determine Package Use:

   Organization? Internal Use? - You are not subject to distribution
   rights when you keep everything internal. Put the binaries directly
   into the tools directory (as long as total nupkg size is under 1GB).

   Community Repository?
   Please ensure you have the right to distribute the binaries.

2. Fill out the package contents:

   __name_replace__.nuspec - fill out metadata
   tools/install.ps1 - set installer urls, checksums and silent args
   tools/uninstall.ps1 - remove if the software uninstalls itself

3. Delete this file.
"#;
