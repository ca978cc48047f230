//! End-to-end tests driving the declextract binary with a fake extraction tool
#![cfg(unix)]

mod utils;

use predicates::prelude::*;
use utils::Workspace;

const X86_TABLE: &str = "\
# <number> <abi> <name> <entry point>
0\tcommon\tread\t\t\tsys_read
1\tcommon\twrite\t\t\tsys_write
105\tcommon\tsetuid\t\t\tsys_setuid16
169\tcommon\treboot\t\t\tsys_reboot
512\tx32\trt_sigaction\t\tcompat_sys_rt_sigaction
";

const ARM_TABLE: &str = "213\tcommon\tsetuid32\t\tsys_setuid16\n";

const FS_OUTPUT: &str = "\
include <include/linux/fs.h>
resource fd_auto[fd]
read$auto(fd fd, buf ptr[out, array[int8]], count len[buf])
write$auto(fd fd, buf ptr[in, array[int8]], count len[buf])
";

const CRED_OUTPUT: &str = "\
include <include/linux/cred.h>
include <include/linux/fs.h>
type uid_auto int32
setuid16$auto(uid uid_auto)
reboot$auto(magic int32)
kexec_load$auto(entry intptr)
";

const NET_OUTPUT: &str = "\
sendmsg$auto_foo(fd sock_nl_generic, msg ptr[in, msghdr_auto[FOO_CMD_GET, foo_policy]], f flags[send_flags])
sendmsg$auto_foo(fd sock_nl_generic, msg ptr[in, msghdr_auto[FOO_CMD_SET, foo_policy]], f flags[send_flags])
sendmsg$auto_lost(fd sock_nl_generic, msg ptr[in, msghdr_auto[LOST_CMD, lost_policy]], f flags[send_flags])
foo_policy [
\tFOO_ATTR_ID nlattr[FOO_ATTR_ID, int32]
] [varlen]
bar_policy [
\tBAR_ATTR_NAME nlattr[BAR_ATTR_NAME, string]
] [varlen]
";

fn setup(files: &[&str]) -> Workspace {
    let ws = Workspace::new();
    ws.write_table("x86/entry/syscalls/syscall_64.tbl", X86_TABLE);
    ws.write_table("arm/tools/syscall.tbl", ARM_TABLE);
    ws.write_compile_commands(files);
    ws.write_tool(&[
        ("fs/read_write.c", FS_OUTPUT),
        ("kernel/sys.c", CRED_OUTPUT),
        ("net/foo/genl.c", NET_OUTPUT),
    ]);
    ws
}

const ALL_FILES: &[&str] = &[
    "fs/read_write.c",
    "arch/x86/entry/entry_64.S",
    "kernel/sys.c",
    "net/foo/genl.c",
];

#[test]
fn test_missing_kernel_dir_is_fatal() {
    let ws = setup(ALL_FILES);
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("declextract");
    cmd.arg("--compile-commands")
        .arg(ws.compile_commands_path())
        .arg("--output")
        .arg(ws.output_path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("path to kernel directory is required"));
    assert!(!ws.output_path().exists());
}

#[test]
fn test_generates_description() {
    let ws = setup(ALL_FILES);
    ws.command().assert().success();

    let out = ws.read_output();
    assert!(out.starts_with("# Code generated by syz-declextract. DO NOT EDIT.\n"));

    // Includes: common headers first, then merged and deduplicated
    assert!(out.contains("include <include/vdso/bits.h>\ninclude <include/linux/types.h>\n"));
    assert_eq!(out.matches("include <include/linux/fs.h>\n").count(), 1);
    assert!(out.contains("include <include/linux/cred.h>\ninclude <include/linux/fs.h>\n"));

    // Renamed per architecture table; unresolved and prohibited calls dropped
    assert!(out.contains("setuid$auto(uid uid_auto)\n"));
    assert!(out.contains("setuid32$auto(uid uid_auto)\n"));
    assert!(!out.contains("setuid16"));
    assert!(!out.contains("reboot$auto"));
    assert!(!out.contains("kexec_load"));
    assert!(out.contains("read$auto(fd fd, buf ptr[out, array[int8]], count len[buf])\n"));

    // Both policy-qualified sends survive with numeric suffixes; dangling one is gone
    assert!(out.contains("sendmsg$auto_foo0(fd sock_nl_generic, msg ptr[in, msghdr_auto[FOO_CMD_GET, foo_policy]]"));
    assert!(out.contains("sendmsg$auto_foo1(fd sock_nl_generic, msg ptr[in, msghdr_auto[FOO_CMD_SET, foo_policy]]"));
    assert!(!out.contains("lost_policy"));

    // Only the unused policy gets a union arm
    assert!(out.contains("auto_union [\n\tpolicy0 msghdr_auto[bar_policy]\n]\n"));
    assert!(!out.contains("msghdr_auto[foo_policy]"));
    assert!(out.contains("_ = __NR_mmap2\n"));
    assert!(out.contains("sendmsg$autorun(fd sock_nl_generic, msg ptr[in, auto_union], f flags[send_flags])\n"));
}

#[test]
fn test_output_independent_of_database_order() {
    let ws = setup(ALL_FILES);
    ws.command().assert().success();
    let forward = ws.read_output();

    let mut reversed: Vec<&str> = ALL_FILES.to_vec();
    reversed.reverse();
    ws.write_compile_commands(&reversed);
    ws.command().arg("--jobs").arg("1").assert().success();
    assert_eq!(forward, ws.read_output());
}

#[test]
fn test_tool_stderr_is_fatal() {
    let ws = setup(&["fs/read_write.c", "drivers/bad.c"]);
    ws.write_tool(&[
        ("fs/read_write.c", FS_OUTPUT),
        ("drivers/bad.c", "ERR:drivers/bad.c:10:3: error: unknown type name 'u99'\n"),
    ]);

    ws.command()
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown type name 'u99'"));
    assert!(!ws.output_path().exists());
}

#[test]
fn test_tool_exit_without_stderr_names_file() {
    let ws = setup(&["drivers/quiet.c"]);
    ws.write_tool(&[("drivers/quiet.c", "EXIT:3")]);

    ws.command()
        .assert()
        .failure()
        .stderr(predicate::str::contains("drivers/quiet.c: exit status: 3"));
    assert!(!ws.output_path().exists());
}

#[test]
fn test_unparsable_tool_output_is_echoed() {
    let ws = setup(&["drivers/odd.c"]);
    ws.write_tool(&[("drivers/odd.c", "odd$auto(fd fd\n")]);

    ws.command()
        .assert()
        .failure()
        .stdout(predicate::str::contains("odd$auto(fd fd"))
        .stderr(predicate::str::contains("Parsing error"));
    assert!(!ws.output_path().exists());
}

#[test]
fn test_malformed_database_is_fatal() {
    let ws = setup(ALL_FILES);
    std::fs::write(ws.compile_commands_path(), "{ not json").unwrap();

    ws.command()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load compilation database"));
}

#[test]
fn test_zero_jobs_rejected() {
    let ws = setup(ALL_FILES);
    ws.command()
        .arg("--jobs")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--jobs"));
}

#[test]
fn test_unreadable_syscall_table_is_fatal() {
    let ws = setup(ALL_FILES);
    std::fs::create_dir_all(ws.kernel_dir().join("arch/x86/entry/syscalls/broken.tbl")).unwrap();

    ws.command()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read syscall table"))
        .stderr(predicate::str::contains("broken.tbl"));
    assert!(!ws.output_path().exists());
}

#[test]
fn test_empty_database_still_emits_union() {
    let ws = setup(&[]);
    ws.command().assert().success();
    let out = ws.read_output();
    assert!(out.contains("resource autogenerated_netlink[int16]\n"));
    assert!(out.contains("auto_union [\n]\n"));
}
