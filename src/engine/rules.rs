//! The ordered rule catalogue
//!
//! Each rule pairs a predicate over the symbol table with the mutation it
//! performs when the predicate holds, plus the comment and preprocessor text
//! rendered into the generated header's sanity-check section. Order is
//! load-bearing: a later rule reads values an earlier rule may have just
//! written (the socket-count rule must see the CONFIG_NET that the
//! network-support rule may have just removed), and no rule is ever
//! re-evaluated.

use crate::symbols::ConfigTable;

/// Loadable binary formats; if none is configured the whole binary-format
/// subsystem is disabled
pub const BINARY_FORMATS: &[&str] = &["CONFIG_NXFLAT", "CONFIG_ELF", "CONFIG_BUILTIN"];

/// Console devices that require file descriptor and stream resources
pub const CONSOLE_DEVICES: &[&str] = &[
    "CONFIG_DEV_CONSOLE",
    "CONFIG_CDCACM_CONSOLE",
    "CONFIG_PL2303_CONSOLE",
];

/// Builtin low-level console devices, meaningless without a console
pub const LOW_CONSOLE_DEVICES: &[&str] = &["CONFIG_DEV_LOWCONSOLE", "CONFIG_RAMLOG_CONSOLE"];

/// Filesystems that cannot work without mountpoint support
pub const MOUNTED_FILESYSTEMS: &[&str] = &[
    "CONFIG_FS_FAT",
    "CONFIG_FS_ROMFS",
    "CONFIG_FS_NXFFS",
    "CONFIG_FS_SMARTFS",
    "CONFIG_FS_BINFS",
    "CONFIG_NFS",
];

/// Transport and protocol options layered on basic network support
pub const NET_PROTOCOLS: &[&str] = &["CONFIG_NET_TCP", "CONFIG_NET_UDP", "CONFIG_NET_ICMP"];

/// Per-subsystem debug options gated on the top-level debug flag
pub const DEBUG_OPTIONS: &[&str] = &[
    "CONFIG_DEBUG_VERBOSE",
    "CONFIG_DEBUG_SCHED",
    "CONFIG_DEBUG_MM",
    "CONFIG_DEBUG_PAGING",
    "CONFIG_DEBUG_DMA",
    "CONFIG_DEBUG_FS",
    "CONFIG_DEBUG_LIB",
    "CONFIG_DEBUG_BINFMT",
    "CONFIG_DEBUG_NET",
    "CONFIG_DEBUG_USB",
    "CONFIG_DEBUG_GRAPHICS",
    "CONFIG_DEBUG_GPIO",
    "CONFIG_DEBUG_SPI",
    "CONFIG_DEBUG_HEAP",
];

/// A consistency rule.
///
/// The decision half (`predicate`, `action`) operates on the symbol table and
/// is what the engine runs. The presentation half (`comment`, `directives`)
/// is the equivalent conditional text rendered into the generated header, so
/// that code compiled against a hand-edited header is held to the same
/// constraints.
pub struct Rule {
    /// Short identifier used in tests and diagnostics
    pub name: &'static str,
    /// Comment lines rendered above the directive text (empty line = spacer)
    pub comment: &'static [&'static str],
    /// Verbatim preprocessor text for the generated header
    pub directives: &'static str,
    /// Read-only decision over the current table
    pub predicate: fn(&ConfigTable) -> bool,
    /// Mutation applied when the predicate holds
    pub action: fn(&mut ConfigTable),
}

fn any_defined(table: &ConfigTable, names: &[&str]) -> bool {
    names.iter().any(|name| table.is_defined(name))
}

fn undefine_all(table: &mut ConfigTable, names: &[&str]) {
    for name in names {
        table.undefine(name);
    }
}

/// The full catalogue, in the exact order it is applied.
pub const CATALOGUE: &[Rule] = &[
    // An external NXFLAT build against a base without NXFLAT support is a
    // caller contract violation. Only the generated header checks it; the
    // table pass has nothing to enforce and applies the remaining rules to
    // whatever state it was given.
    Rule {
        name: "external_binfmt_check",
        comment: &[
            "If this is an NXFLAT, external build, then make sure that",
            "NXFLAT support is enabled in the base code.",
        ],
        directives: "#if defined(__NXFLAT__) && !defined(CONFIG_NXFLAT)\n\
                     # error \"NXFLAT support not enabled in this configuration\"\n\
                     #endif\n",
        predicate: |table| table.is_defined("__NXFLAT__") && !table.is_defined("CONFIG_NXFLAT"),
        action: |_| {},
    },
    Rule {
        name: "nxflat_requires_pic",
        comment: &["NXFLAT requires PIC support in the TCBs."],
        directives: "#if defined(CONFIG_NXFLAT)\n\
                     # undef CONFIG_PIC\n\
                     # define CONFIG_PIC 1\n\
                     #endif\n",
        predicate: |table| table.is_defined("CONFIG_NXFLAT"),
        action: |table| table.define("CONFIG_PIC"),
    },
    Rule {
        name: "binfmt_disable",
        comment: &[
            "Binary format support is disabled if no binary formats are",
            "configured (at present, NXFLAT is the only supported binary",
            "format).",
        ],
        directives: "#if !defined(CONFIG_NXFLAT) && !defined(CONFIG_ELF) && !defined(CONFIG_BUILTIN)\n\
                     # undef CONFIG_BINFMT_DISABLE\n\
                     # define CONFIG_BINFMT_DISABLE 1\n\
                     #endif\n",
        predicate: |table| !any_defined(table, BINARY_FORMATS),
        action: |table| table.define("CONFIG_BINFMT_DISABLE"),
    },
    Rule {
        name: "rr_interval_default",
        comment: &[
            "The correct way to disable RR scheduling is to set the",
            "timeslice to zero.",
        ],
        directives: "#ifndef CONFIG_RR_INTERVAL\n\
                     # define CONFIG_RR_INTERVAL 0\n\
                     #endif\n",
        predicate: |table| !table.is_defined("CONFIG_RR_INTERVAL"),
        action: |table| table.set_int("CONFIG_RR_INTERVAL", 0),
    },
    Rule {
        name: "nfile_descriptors_default",
        comment: &[
            "The correct way to disable filesystem support is to set the number of",
            "file descriptors to zero.",
        ],
        directives: "#ifndef CONFIG_NFILE_DESCRIPTORS\n\
                     # define CONFIG_NFILE_DESCRIPTORS 0\n\
                     #endif\n",
        predicate: |table| !table.is_defined("CONFIG_NFILE_DESCRIPTORS"),
        action: |table| table.set_int("CONFIG_NFILE_DESCRIPTORS", 0),
    },
    Rule {
        name: "console_descriptors",
        comment: &[
            "If a console is selected, then make sure that there are resources for",
            "three file descriptors and, if any streams are selected, also for three",
            "file streams.",
            "",
            "CONFIG_DEV_CONSOLE means that a builtin console device exists at",
            "/dev/console and can be opened during boot-up. Other consoles, such as",
            "USB consoles, may not exist at boot-up and have to be handled in a",
            "different way. Three file descriptors and three file streams are still",
            "needed.",
        ],
        directives: "#if defined(CONFIG_DEV_CONSOLE) || defined(CONFIG_CDCACM_CONSOLE) || \\\n\
                     \x20   defined(CONFIG_PL2303_CONSOLE)\n\
                     # if CONFIG_NFILE_DESCRIPTORS < 3\n\
                     #   undef CONFIG_NFILE_DESCRIPTORS\n\
                     #   define CONFIG_NFILE_DESCRIPTORS 3\n\
                     # endif\n\
                     \n\
                     # if CONFIG_NFILE_STREAMS > 0 && CONFIG_NFILE_STREAMS < 3\n\
                     #  undef CONFIG_NFILE_STREAMS\n\
                     #  define CONFIG_NFILE_STREAMS 3\n\
                     # endif\n",
        predicate: |table| any_defined(table, CONSOLE_DEVICES),
        action: |table| {
            if table
                .numeric("CONFIG_NFILE_DESCRIPTORS")
                .map_or(false, |v| v < 3)
            {
                table.set_int("CONFIG_NFILE_DESCRIPTORS", 3);
            }
            if table.is_defined_and_at_least("CONFIG_NFILE_STREAMS", 1)
                && table.is_defined_and_at_most("CONFIG_NFILE_STREAMS", 2)
            {
                table.set_int("CONFIG_NFILE_STREAMS", 3);
            }
        },
    },
    Rule {
        name: "no_console_devices",
        comment: &["If no console is selected, then disable all builtin console devices"],
        directives: "#else\n\
                     #  undef CONFIG_DEV_LOWCONSOLE\n\
                     #  undef CONFIG_RAMLOG_CONSOLE\n\
                     #endif\n",
        predicate: |table| !any_defined(table, CONSOLE_DEVICES),
        action: |table| undefine_all(table, LOW_CONSOLE_DEVICES),
    },
    Rule {
        name: "sem_preallocholders",
        comment: &[
            "If priority inheritance is disabled, then do not allocate any",
            "associated resources.",
        ],
        directives: "#if !defined(CONFIG_PRIORITY_INHERITANCE) || !defined(CONFIG_SEM_PREALLOCHOLDERS)\n\
                     # undef CONFIG_SEM_PREALLOCHOLDERS\n\
                     # define CONFIG_SEM_PREALLOCHOLDERS 0\n\
                     #endif\n",
        predicate: |table| {
            !table.is_defined("CONFIG_PRIORITY_INHERITANCE")
                || !table.is_defined("CONFIG_SEM_PREALLOCHOLDERS")
        },
        action: |table| table.set_int("CONFIG_SEM_PREALLOCHOLDERS", 0),
    },
    Rule {
        name: "sem_nnestprio",
        comment: &[],
        directives: "#if !defined(CONFIG_PRIORITY_INHERITANCE) || !defined(CONFIG_SEM_NNESTPRIO)\n\
                     # undef CONFIG_SEM_NNESTPRIO\n\
                     # define CONFIG_SEM_NNESTPRIO 0\n\
                     #endif\n",
        predicate: |table| {
            !table.is_defined("CONFIG_PRIORITY_INHERITANCE")
                || !table.is_defined("CONFIG_SEM_NNESTPRIO")
        },
        action: |table| table.set_int("CONFIG_SEM_NNESTPRIO", 0),
    },
    Rule {
        name: "streams_require_descriptors",
        comment: &[
            "If no file descriptors are configured, then make certain no",
            "streams are configured either.",
        ],
        directives: "#if CONFIG_NFILE_DESCRIPTORS == 0\n\
                     # undef CONFIG_NFILE_STREAMS\n\
                     # define CONFIG_NFILE_STREAMS 0\n\
                     #endif\n",
        predicate: |table| table.numeric("CONFIG_NFILE_DESCRIPTORS") == Some(0),
        action: |table| table.set_int("CONFIG_NFILE_STREAMS", 0),
    },
    Rule {
        name: "mm_regions_default",
        comment: &["There must be at least one memory region."],
        directives: "#ifndef CONFIG_MM_REGIONS\n\
                     # define CONFIG_MM_REGIONS 1\n\
                     #endif\n",
        predicate: |table| !table.is_defined("CONFIG_MM_REGIONS"),
        action: |table| table.set_int("CONFIG_MM_REGIONS", 1),
    },
    Rule {
        name: "ram_end_default",
        comment: &[
            "If the end of RAM is not specified then it is assumed to be the beginning",
            "of RAM plus the RAM size.",
        ],
        directives: "#ifndef CONFIG_RAM_END\n\
                     # define CONFIG_RAM_END (CONFIG_RAM_START+CONFIG_RAM_SIZE)\n\
                     #endif\n",
        predicate: |table| !table.is_defined("CONFIG_RAM_END"),
        action: |table| table.set_expr("CONFIG_RAM_END", "(CONFIG_RAM_START+CONFIG_RAM_SIZE)"),
    },
    Rule {
        name: "ram_vend_default",
        comment: &[],
        directives: "#ifndef CONFIG_RAM_VEND\n\
                     # define CONFIG_RAM_VEND (CONFIG_RAM_VSTART+CONFIG_RAM_SIZE)\n\
                     #endif\n",
        predicate: |table| !table.is_defined("CONFIG_RAM_VEND"),
        action: |table| table.set_expr("CONFIG_RAM_VEND", "(CONFIG_RAM_VSTART+CONFIG_RAM_SIZE)"),
    },
    Rule {
        name: "flash_end_default",
        comment: &[
            "If the end of FLASH is not specified then it is assumed to be the beginning",
            "of FLASH plus the FLASH size.",
        ],
        directives: "#ifndef CONFIG_FLASH_END\n\
                     # define CONFIG_FLASH_END (CONFIG_FLASH_START+CONFIG_FLASH_SIZE)\n\
                     #endif\n",
        predicate: |table| !table.is_defined("CONFIG_FLASH_END"),
        action: |table| {
            table.set_expr("CONFIG_FLASH_END", "(CONFIG_FLASH_START+CONFIG_FLASH_SIZE)")
        },
    },
    Rule {
        name: "stdio_buffer_requires_streams",
        comment: &[
            "If no file streams are configured, then make certain that buffered I/O",
            "support is disabled",
        ],
        directives: "#if CONFIG_NFILE_STREAMS == 0\n\
                     # undef CONFIG_STDIO_BUFFER_SIZE\n\
                     # define CONFIG_STDIO_BUFFER_SIZE 0\n\
                     #endif\n",
        predicate: |table| table.numeric("CONFIG_NFILE_STREAMS") == Some(0),
        action: |table| table.set_int("CONFIG_STDIO_BUFFER_SIZE", 0),
    },
    Rule {
        name: "linebuffer_requires_buffering",
        comment: &[
            "If standard C buffered I/O is not supported, then line-oriented buffering",
            "cannot be supported.",
        ],
        directives: "#if CONFIG_STDIO_BUFFER_SIZE == 0\n\
                     # undef CONFIG_STDIO_LINEBUFFER\n\
                     #endif\n",
        predicate: |table| table.numeric("CONFIG_STDIO_BUFFER_SIZE") == Some(0),
        action: |table| table.undefine("CONFIG_STDIO_LINEBUFFER"),
    },
    Rule {
        name: "mq_maxmsgsize",
        comment: &[
            "If the maximum message size is zero, then we assume that message queues",
            "support should be disabled",
        ],
        directives: "#if !defined(CONFIG_MQ_MAXMSGSIZE) || defined(CONFIG_DISABLE_MQUEUE)\n\
                     # undef CONFIG_MQ_MAXMSGSIZE\n\
                     # define CONFIG_MQ_MAXMSGSIZE 0\n\
                     #endif\n",
        predicate: |table| {
            !table.is_defined("CONFIG_MQ_MAXMSGSIZE") || table.is_defined("CONFIG_DISABLE_MQUEUE")
        },
        action: |table| table.set_int("CONFIG_MQ_MAXMSGSIZE", 0),
    },
    Rule {
        name: "disable_mqueue",
        comment: &[],
        directives: "#if CONFIG_MQ_MAXMSGSIZE <= 0 && !defined(CONFIG_DISABLE_MQUEUE)\n\
                     # define CONFIG_DISABLE_MQUEUE 1\n\
                     #endif\n",
        predicate: |table| {
            table.numeric("CONFIG_MQ_MAXMSGSIZE").map_or(false, |v| v <= 0)
                && !table.is_defined("CONFIG_DISABLE_MQUEUE")
        },
        action: |table| table.define("CONFIG_DISABLE_MQUEUE"),
    },
    Rule {
        name: "mountpoint_filesystems",
        comment: &["If mountpoint support is not included, then no filesystem can be supported"],
        directives: "#ifdef CONFIG_DISABLE_MOUNTPOINT\n\
                     # undef CONFIG_FS_FAT\n\
                     # undef CONFIG_FS_ROMFS\n\
                     # undef CONFIG_FS_NXFFS\n\
                     # undef CONFIG_FS_SMARTFS\n\
                     # undef CONFIG_FS_BINFS\n\
                     # undef CONFIG_NFS\n\
                     #endif\n",
        predicate: |table| table.is_defined("CONFIG_DISABLE_MOUNTPOINT"),
        action: |table| undefine_all(table, MOUNTED_FILESYSTEMS),
    },
    Rule {
        name: "net_requires_sockets",
        comment: &["There can be no network support with no socket descriptors"],
        directives: "#if CONFIG_NSOCKET_DESCRIPTORS <= 0\n\
                     # undef CONFIG_NET\n\
                     #endif\n",
        predicate: |table| {
            table
                .numeric("CONFIG_NSOCKET_DESCRIPTORS")
                .map_or(false, |v| v <= 0)
        },
        action: |table| table.undefine("CONFIG_NET"),
    },
    Rule {
        name: "sockets_require_net",
        comment: &[
            "Conversely, if there is no network support, there is no need for",
            "socket descriptors",
        ],
        directives: "#ifndef CONFIG_NET\n\
                     # undef CONFIG_NSOCKET_DESCRIPTORS\n\
                     # define CONFIG_NSOCKET_DESCRIPTORS 0\n\
                     #endif\n",
        predicate: |table| !table.is_defined("CONFIG_NET"),
        action: |table| table.set_int("CONFIG_NSOCKET_DESCRIPTORS", 0),
    },
    Rule {
        name: "protocols_require_net",
        comment: &["Protocol support can only be provided on top of basic network support"],
        directives: "#ifndef CONFIG_NET\n\
                     # undef CONFIG_NET_TCP\n\
                     # undef CONFIG_NET_UDP\n\
                     # undef CONFIG_NET_ICMP\n\
                     #endif\n",
        predicate: |table| !table.is_defined("CONFIG_NET"),
        action: |table| undefine_all(table, NET_PROTOCOLS),
    },
    Rule {
        name: "nfs_requires_udp",
        comment: &["NFS client can only be provided on top of UDP network support"],
        directives: "#if !defined(CONFIG_NET) || !defined(CONFIG_NET_UDP)\n\
                     # undef CONFIG_NFS\n\
                     #endif\n",
        predicate: |table| {
            !table.is_defined("CONFIG_NET") || !table.is_defined("CONFIG_NET_UDP")
        },
        action: |table| table.undefine("CONFIG_NFS"),
    },
    Rule {
        name: "debug_options",
        comment: &["Verbose debug and sub-system debug only make sense if debug is enabled"],
        directives: "#ifndef CONFIG_DEBUG\n\
                     # undef CONFIG_DEBUG_VERBOSE\n\
                     # undef CONFIG_DEBUG_SCHED\n\
                     # undef CONFIG_DEBUG_MM\n\
                     # undef CONFIG_DEBUG_PAGING\n\
                     # undef CONFIG_DEBUG_DMA\n\
                     # undef CONFIG_DEBUG_FS\n\
                     # undef CONFIG_DEBUG_LIB\n\
                     # undef CONFIG_DEBUG_BINFMT\n\
                     # undef CONFIG_DEBUG_NET\n\
                     # undef CONFIG_DEBUG_USB\n\
                     # undef CONFIG_DEBUG_GRAPHICS\n\
                     # undef CONFIG_DEBUG_GPIO\n\
                     # undef CONFIG_DEBUG_SPI\n\
                     # undef CONFIG_DEBUG_HEAP\n\
                     #endif\n",
        predicate: |table| !table.is_defined("CONFIG_DEBUG"),
        action: |table| undefine_all(table, DEBUG_OPTIONS),
    },
    Rule {
        name: "user_entrypoint_default",
        comment: &[
            "User entry point. This is provided as a fall-back to keep compatibility",
            "with existing code, for builds which do not define CONFIG_USER_ENTRYPOINT.",
        ],
        directives: "#ifndef CONFIG_USER_ENTRYPOINT\n\
                     # define CONFIG_USER_ENTRYPOINT main\n\
                     #endif\n",
        predicate: |table| !table.is_defined("CONFIG_USER_ENTRYPOINT"),
        action: |table| table.set_expr("CONFIG_USER_ENTRYPOINT", "main"),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_names_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for rule in CATALOGUE {
            assert!(seen.insert(rule.name), "duplicate rule name: {}", rule.name);
        }
    }

    #[test]
    fn test_directives_are_wellformed() {
        for rule in CATALOGUE {
            assert!(
                !rule.directives.is_empty(),
                "rule {} has no directive text",
                rule.name
            );
            assert!(
                rule.directives.ends_with('\n'),
                "rule {} directives missing trailing newline",
                rule.name
            );
        }
    }

    #[test]
    fn test_conditional_blocks_balance() {
        // The concatenated sanity section must have matching #if/#endif pairs
        // even though the console if/else block spans two catalogue entries.
        let mut depth: i32 = 0;
        for rule in CATALOGUE {
            for line in rule.directives.lines() {
                let line = line.trim_start();
                if line.starts_with("#if") || line.starts_with("# if") {
                    depth += 1;
                } else if line.starts_with("#endif") || line.starts_with("# endif") {
                    depth -= 1;
                }
                assert!(depth >= 0, "unbalanced #endif near rule {}", rule.name);
            }
        }
        assert_eq!(depth, 0, "unclosed conditional in sanity directives");
    }

    #[test]
    fn test_external_binfmt_rule_never_mutates() {
        let rule = CATALOGUE
            .iter()
            .find(|rule| rule.name == "external_binfmt_check")
            .expect("rule missing");

        let mut table = ConfigTable::new();
        table.define("__NXFLAT__");
        assert!((rule.predicate)(&table));

        let before = table.clone();
        (rule.action)(&mut table);
        assert_eq!(table, before);
    }

    #[test]
    fn test_console_predicate_matches_any_device() {
        let rule = CATALOGUE
            .iter()
            .find(|rule| rule.name == "console_descriptors")
            .expect("rule missing");

        for device in CONSOLE_DEVICES {
            let mut table = ConfigTable::new();
            table.define(device);
            assert!((rule.predicate)(&table), "console {} not recognized", device);
        }

        let empty = ConfigTable::new();
        assert!(!(rule.predicate)(&empty));
    }
}
